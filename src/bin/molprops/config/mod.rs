mod dispatcher;
mod pipeline;

pub use dispatcher::build_dispatcher;
pub use pipeline::build_pipeline_config;
