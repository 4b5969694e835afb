use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;

use startomo::star_table::splitter::split_table;
use startomo::StarTable;

fn utf8_dir(dir: &TempDir) -> Utf8PathBuf {
    Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap()
}

fn particle_table(n_rows: usize) -> StarTable {
    let mut table = StarTable::new(
        "particles",
        vec![
            "rlnMicrographName".to_string(),
            "rlnImageName".to_string(),
            "rlnCoordinateX".to_string(),
        ],
    );
    for i in 0..n_rows {
        table
            .add_row(vec![
                format!("tomo{i}.mrc"),
                format!("part_tid_{i}.mrc"),
                format!("{}.5", i * 10),
            ])
            .unwrap();
    }
    table
}

#[test]
fn test_write_read_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = utf8_dir(&dir).join("particles.star");

    let table = particle_table(5);
    table.write(&path).unwrap();
    let back = StarTable::read(&path).unwrap();

    assert_eq!(back, table);
}

#[test]
fn test_round_trip_is_stable() {
    // A second write/read cycle must be byte-stable: whitespace is already
    // normalized after the first pass.
    let dir = TempDir::new().unwrap();
    let base = utf8_dir(&dir);
    let first = base.join("first.star");
    let second = base.join("second.star");

    let table = particle_table(3);
    table.write(&first).unwrap();
    StarTable::read(&first).unwrap().write(&second).unwrap();

    assert_eq!(
        std::fs::read_to_string(&first).unwrap(),
        std::fs::read_to_string(&second).unwrap()
    );
}

#[test]
fn test_read_rejects_headerless_file() {
    let dir = TempDir::new().unwrap();
    let path = utf8_dir(&dir).join("bad.star");
    std::fs::write(&path, "tomo1.mrc 100 200\n").unwrap();

    let err = StarTable::read(&path).unwrap_err();
    assert!(err.to_string().contains("loop_"));
}

#[test]
fn test_split_completeness() {
    let dir = TempDir::new().unwrap();
    let base = utf8_dir(&dir);
    let in_star = base.join("all.star");
    let out_dir = base.join("splits");
    std::fs::create_dir(&out_dir).unwrap();

    let table = particle_table(7);
    table.write(&in_star).unwrap();

    let written = split_table(&in_star, &out_dir, 3, "graphs_", 1).unwrap();

    // ceil(7 / 3) files, named from the first index.
    assert_eq!(written.len(), 3);
    assert_eq!(written[0].file_name(), Some("graphs_001.star"));
    assert_eq!(written[2].file_name(), Some("graphs_003.star"));

    // Row counts sum to the input size and concatenation preserves order.
    let mut gathered: Vec<Vec<String>> = Vec::new();
    for path in &written {
        let part = StarTable::read(path).unwrap();
        assert_eq!(part.column_names(), table.column_names());
        gathered.extend(part.rows().map(|r| r.to_vec()));
    }
    let original: Vec<Vec<String>> = table.rows().map(|r| r.to_vec()).collect();
    assert_eq!(gathered, original);
}

#[test]
fn test_split_one_file_per_row() {
    let dir = TempDir::new().unwrap();
    let base = utf8_dir(&dir);
    let in_star = base.join("all.star");

    particle_table(4).write(&in_star).unwrap();
    let written = split_table(&in_star, &base, 1, "vesicle_", 1).unwrap();

    assert_eq!(written.len(), 4);
    for (i, path) in written.iter().enumerate() {
        let part = StarTable::read(path).unwrap();
        assert_eq!(part.len(), 1);
        assert_eq!(part.get(0, "rlnImageName"), Some(&*format!("part_tid_{i}.mrc")));
    }
}

#[test]
fn test_split_single_row_links_verbatim() {
    let dir = TempDir::new().unwrap();
    let base = utf8_dir(&dir);
    let in_star = base.join("single.star");

    particle_table(1).write(&in_star).unwrap();
    let written = split_table(&in_star, &base, 5, "graphs_", 1).unwrap();

    assert_eq!(written.len(), 1);
    assert_eq!(written[0].file_name(), Some("graphs_001.star"));
    // Linked, not rewritten: output is byte-equal to the input file.
    assert_eq!(
        std::fs::read(&in_star).unwrap(),
        std::fs::read(&written[0]).unwrap()
    );
}

#[test]
fn test_split_numbering_continues_from_first_index() {
    let dir = TempDir::new().unwrap();
    let base = utf8_dir(&dir);
    let in_star = base.join("all.star");

    particle_table(4).write(&in_star).unwrap();
    let written = split_table(&in_star, &base, 2, "fils_", 3).unwrap();

    let names: Vec<&str> = written
        .iter()
        .map(|p| p.file_name().unwrap())
        .collect();
    assert_eq!(names, vec!["fils_003.star", "fils_004.star"]);
}

#[test]
fn test_split_is_deterministic() {
    let dir = TempDir::new().unwrap();
    let base = utf8_dir(&dir);
    let in_star = base.join("all.star");
    let out_a = base.join("a");
    let out_b = base.join("b");
    std::fs::create_dir(&out_a).unwrap();
    std::fs::create_dir(&out_b).unwrap();

    particle_table(6).write(&in_star).unwrap();
    let first = split_table(&in_star, &out_a, 4, "graphs_", 1).unwrap();
    let second = split_table(&in_star, &out_b, 4, "graphs_", 1).unwrap();

    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(&second) {
        assert_eq!(
            std::fs::read(a).unwrap(),
            std::fs::read(b).unwrap(),
            "split outputs differ between runs"
        );
    }
}

#[test]
fn test_read_reference_relion_block() {
    // Layout as emitted by the external toolkit, with aligned columns.
    let dir = TempDir::new().unwrap();
    let path = utf8_dir(&dir).join("ref.star");
    std::fs::write(
        &path,
        "\
data_

loop_
_rlnMicrographName #1
_rlnCoordinateX #2
_rlnCoordinateY #3
_rlnCoordinateZ #4
tomo1.mrc   100.000000   200.000000    50.000000
tomo1.mrc    10.000000    20.000000    30.000000
",
    )
    .unwrap();

    let table = StarTable::read(Utf8Path::new(path.as_str())).unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(table.get(0, "rlnCoordinateZ"), Some("50.000000"));
    assert!(table.has_all_columns(&["rlnMicrographName", "rlnCoordinateX"]));
}
