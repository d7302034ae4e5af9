use assert_cmd::{cargo::cargo_bin_cmd, Command};
use rusqlite::{params, Connection};
use std::path::Path;

pub fn upriver() -> Command {
    cargo_bin_cmd!("upriver")
}

/// Create an exchange database at `db_path` and seed a small steel
/// supply graph:
///
/// ```text
/// root (Steel rolling) <- a (Pig iron)  via f1, value 5.0
///                      <- b (Scrap melt) via f2, value 1.0
/// a                    <- c (Ore mining) via f3, value 2.0
/// ```
#[allow(dead_code)]
pub fn seed_database(db_path: &Path) {
    upriver()
        .arg("--db")
        .arg(db_path)
        .arg("init")
        .assert()
        .success();

    let conn = Connection::open(db_path).unwrap();

    let exchanges: &[(&str, &str, &str, Option<&str>, f64, bool)] = &[
        ("e1", "root", "f1", Some("a"), 5.0, true),
        ("e2", "root", "f2", Some("b"), 1.0, true),
        ("e3", "a", "f3", Some("c"), 2.0, true),
        ("o1", "root", "f0", None, 10.0, false),
    ];
    for (id, process_id, flow_id, provider_id, value, is_input) in exchanges {
        conn.execute(
            "INSERT INTO exchanges
             (id, process_id, flow_id, provider_id, value, unit_id, gwp, gwp_contribution,
              is_input, is_deleted, version)
             VALUES (?1, ?2, ?3, ?4, ?5, 'u1', NULL, NULL, ?6, 0, '1.4.0')",
            params![id, process_id, flow_id, provider_id, value, *is_input as i64],
        )
        .unwrap();
    }

    let processes = &[
        ("root", "Steel rolling"),
        ("a", "Pig iron"),
        ("b", "Scrap melt"),
        ("c", "Ore mining"),
    ];
    for (id, name) in processes {
        conn.execute(
            "INSERT INTO processes (id, name, version) VALUES (?1, ?2, '1.4.0')",
            params![id, name],
        )
        .unwrap();
    }

    let flows = &[
        ("f0", "hot rolled coil"),
        ("f1", "pig iron"),
        ("f2", "steel scrap"),
        ("f3", "iron ore"),
    ];
    for (id, name) in flows {
        conn.execute(
            "INSERT INTO flows (id, name, version) VALUES (?1, ?2, '1.4.0')",
            params![id, name],
        )
        .unwrap();
    }

    conn.execute("INSERT INTO units (id, name) VALUES ('u1', 'kg')", [])
        .unwrap();
}

/// Create a category database where only exchange `e2` of the root
/// process belongs to the given category.
#[allow(dead_code)]
pub fn seed_filter_database(filter_path: &Path, category: &str) {
    let conn = Connection::open(filter_path).unwrap();
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS process_data (
            id TEXT PRIMARY KEY,
            process_id TEXT NOT NULL,
            category_id TEXT NOT NULL
        );",
    )
    .unwrap();
    conn.execute(
        "INSERT INTO process_data (id, process_id, category_id) VALUES ('e2', 'root', ?1)",
        params![category],
    )
    .unwrap();
}
