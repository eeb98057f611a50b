//! End-to-end: synthesize topologies, write them as a dataset file, read the
//! file back and prepare training partitions.
#![allow(clippy::expect_used)]

use std::fs;
use std::path::PathBuf;

use rand::SeedableRng;
use rand::rngs::StdRng;
use toponet_core::{SynthesisConfig, build_network, parse_network, synthesize_topology};
use toponet_dataset::{
    DatasetRecord, SplitRatios, label_column, one_hot, read_dataset, reindex, split,
    write_dataset, write_split,
};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../tests/fixtures")
        .canonicalize()
        .expect("fixtures directory should exist")
}

fn record_for(name: &str) -> DatasetRecord {
    let text = fs::read_to_string(fixtures_dir().join(name)).expect("fixture readable");
    let mut network = build_network(&parse_network(&text).expect("decodes")).expect("builds");
    let topology =
        synthesize_topology(&mut network, &SynthesisConfig::default()).expect("synthesizes");
    DatasetRecord::from_topology(&network, &topology).expect("complete labels")
}

#[test]
fn fixture_topologies_round_trip_through_csv_and_split() {
    let records: Vec<DatasetRecord> = (0..10).map(|_| record_for("square-tail.json")).collect();

    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("cycle_topo_dataset_5.csv");
    write_dataset(fs::File::create(&path).expect("create"), &records).expect("write");

    let text = fs::read_to_string(&path).expect("read back");
    assert!(text.starts_with("X1 Y1 X2 Y2 X3 Y3 X4 Y4 X5 Y5 C1 C2 C3 C4 C5\n"));

    let read = read_dataset(fs::File::open(&path).expect("open")).expect("parse");
    assert_eq!(read, records);

    let reindexed = reindex(read).expect("reindex");
    assert_eq!(reindexed[0].labels, vec![0, 1, 2, 3, 1]);

    let targets = label_column(&reindexed, 5).expect("column");
    let encoded = one_hot(&targets, 5).expect("one-hot");
    assert!(encoded.iter().all(|row| row == &vec![0, 1, 0, 0, 0]));

    let mut rng = StdRng::seed_from_u64(7);
    let parts = split(reindexed, SplitRatios::default(), &mut rng).expect("split");
    assert_eq!((parts.train.len(), parts.validation.len(), parts.test.len()), (7, 2, 1));

    let files = write_split(dir.path(), "cycle_topo_dataset_5", &parts).expect("write split");
    for path in [&files.train, &files.validation, &files.test] {
        assert!(path.exists(), "{}", path.display());
    }
}
