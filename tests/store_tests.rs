//! High scores persisted through the JSON file store.

use std::fs;

use swapem::core::{ColorPalette, GameSession, Grid, HighScoreStore, SeededRng};
use swapem::store::{JsonHighScoreStore, HIGHSCORE_FILE_NAME};
use swapem::types::Coord;

fn planted() -> Grid {
    let mut rows = [[0u8; 8]; 8];
    for (r, row) in rows.iter_mut().enumerate() {
        for (c, cell) in row.iter_mut().enumerate() {
            *cell = ((r * 2 + c) % 5) as u8;
        }
    }
    rows[4][0] = 7;
    rows[4][1] = 7;
    rows[3][2] = 7;
    Grid::from_colors(rows)
}

#[test]
fn test_score_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(HIGHSCORE_FILE_NAME);

    let store = JsonHighScoreStore::open(&path);
    let mut session = GameSession::from_grid(
        planted(),
        ColorPalette::new(8).unwrap(),
        SeededRng::new(2),
        store,
    );
    session.select(Coord::new(3, 2));
    session.select(Coord::new(4, 2));
    let score = session.score();
    assert!(score >= 30);
    session.restart();

    let reopened = JsonHighScoreStore::open(&path);
    assert_eq!(reopened.load_high_score(8), score);
    assert_eq!(reopened.load_high_score(5), 0);
}

#[test]
fn test_lower_score_does_not_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(HIGHSCORE_FILE_NAME);
    fs::write(&path, r#"{"5": 0, "6": 0, "7": 0, "8": 100000}"#).unwrap();

    let mut session = GameSession::from_grid(
        planted(),
        ColorPalette::new(8).unwrap(),
        SeededRng::new(2),
        JsonHighScoreStore::open(&path),
    );
    assert_eq!(session.high_score(), 100000);
    session.select(Coord::new(3, 2));
    session.select(Coord::new(4, 2));
    session.quit();

    assert_eq!(JsonHighScoreStore::open(&path).load_high_score(8), 100000);
}

#[test]
fn test_corrupt_file_reads_as_zeros_and_is_replaced() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(HIGHSCORE_FILE_NAME);
    fs::write(&path, "not json {").unwrap();

    let mut store = JsonHighScoreStore::open(&path);
    for colors in 5..=8 {
        assert_eq!(store.load_high_score(colors), 0);
    }

    store.save_high_score(6, 420);
    let table = JsonHighScoreStore::read_table(&path).unwrap().unwrap();
    assert_eq!(table.get(6), 420);
}

#[test]
fn test_missing_directory_is_created_on_save() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("scores").join(HIGHSCORE_FILE_NAME);

    let mut store = JsonHighScoreStore::open(&path);
    assert!(!path.exists());
    store.save_high_score(5, 90);
    assert!(path.exists());
    assert_eq!(JsonHighScoreStore::open(&path).load_high_score(5), 90);
}
