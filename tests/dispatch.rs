use molprops::{
    MoleculeTable, Pipeline, PipelineConfig, PipelineError, ProcessDispatcher, SmilesEngine,
    ThreadDispatcher, Value,
};

fn library() -> MoleculeTable {
    MoleculeTable::from_text_rows(
        ["SMILES", "Molecule name", "Batch"],
        [
            ["CCO", "ethanol", "1"],
            ["c1ccccc1", "benzene", "1"],
            ["CC(=O)Oc1ccccc1C(=O)O", "aspirin", "2"],
            ["C1CC(", "broken", "2"],
            ["c1ccncc1", "pyridine", "3"],
            ["CCO", "ethanol", "9"],
            ["OCC(O)CO", "glycerol", "3"],
        ],
    )
}

fn worker() -> ProcessDispatcher {
    ProcessDispatcher::new(env!("CARGO_BIN_EXE_molprops")).arg("worker")
}

#[test]
fn process_workers_match_thread_workers() {
    let config = PipelineConfig::default();
    let by_thread = Pipeline::new(config.clone(), ThreadDispatcher::new(SmilesEngine))
        .run(library())
        .unwrap();
    let by_process = Pipeline::new(config, worker()).run(library()).unwrap();

    assert_eq!(by_process, by_thread);
    assert_eq!(by_process.report.chunk_sizes, vec![3, 3]);
    assert_eq!(by_process.report.duplicates_dropped, 1);
    assert_eq!(by_process.report.parse_failures, 1);
    assert_eq!(by_process.table.value("broken", "logP"), Some(&Value::Null));
    assert_eq!(by_process.table.value("ethanol", "Batch"), Some(&Value::Int(1)));
}

#[test]
fn crashing_worker_fails_the_run() {
    let dispatcher = ProcessDispatcher::new(env!("CARGO_BIN_EXE_molprops")).arg("no-such-command");
    let err = Pipeline::new(PipelineConfig::default(), dispatcher)
        .run(library())
        .unwrap_err();
    assert!(matches!(err, PipelineError::WorkerFailure { chunk: 0, .. }));
}
