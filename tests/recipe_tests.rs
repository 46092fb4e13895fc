//! Recipe command tests

mod common;

use common::{add_stock, json, larder};
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const STARTER: &str = "Spaghetti Bolognese";

fn stock_starter(tmp: &TempDir) {
    add_stock(tmp, "Spaghetti", "0.5", "kg");
    add_stock(tmp, "Minced pork", "1", "kg");
    add_stock(tmp, "Onion", "1", "pcs");
    add_stock(tmp, "Bolognese seasoning", "2", "pcs");
    add_stock(tmp, "Oil", "1", "l");
    add_stock(tmp, "Italian herbs", "1", "pack");
}

#[test]
fn test_first_run_seeds_starter_recipe() {
    let tmp = TempDir::new().unwrap();
    larder(&tmp)
        .args(["recipe", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains(STARTER))
        .stdout(predicate::str::contains("Pasta Dishes"));

    assert!(tmp.path().join("data/recipes.json").exists());
}

#[test]
fn test_removed_starter_stays_removed() {
    let tmp = TempDir::new().unwrap();
    larder(&tmp)
        .args(["recipe", "remove", STARTER])
        .assert()
        .success();

    larder(&tmp)
        .args(["recipe", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No recipes found."));
}

#[test]
fn test_show_marks_availability() {
    let tmp = TempDir::new().unwrap();
    add_stock(&tmp, "Onion", "3", "pcs");

    larder(&tmp)
        .args(["recipe", "show", "spaghetti bolognese"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ingredients (6)"))
        .stdout(predicate::str::contains("(have 3)"));
}

#[test]
fn test_new_recipe_drops_incomplete_rows() {
    let tmp = TempDir::new().unwrap();
    larder(&tmp)
        .args([
            "recipe",
            "new",
            "--name",
            "pancakes",
            "--category",
            "Desserts",
            "-I",
            "Flour:0.2:kg",
            "-I",
            "Milk:0.3:l",
            "-I",
            "salt",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created Pancakes (2 ingredients)"));
}

#[test]
fn test_new_recipe_without_ingredients_fails() {
    let tmp = TempDir::new().unwrap();
    larder(&tmp)
        .args(["recipe", "new", "--name", "Air", "-I", "nothing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least one complete ingredient"));
}

#[test]
fn test_replace_keeps_id() {
    let tmp = TempDir::new().unwrap();
    let before = json(&tmp, &["recipe", "list"]);
    let id = before[0]["id"].as_str().unwrap().to_string();

    larder(&tmp)
        .args([
            "recipe",
            "new",
            "--replace",
            STARTER,
            "--name",
            "Quick Bolognese",
            "-I",
            "Spaghetti:0.25:kg",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Replaced Quick Bolognese"));

    let after = json(&tmp, &["recipe", "list"]);
    let after = after.as_array().unwrap();
    assert_eq!(after.len(), 1);
    assert_eq!(after[0]["id"], id.as_str());
    assert_eq!(after[0]["ingredients"].as_array().unwrap().len(), 1);
}

#[test]
fn test_import_yaml_recipe() {
    let tmp = TempDir::new().unwrap();
    let file = tmp.path().join("lecso.yaml");
    fs::write(
        &file,
        "name: Lecsó\ncategory: Stews\ningredients:\n  - name: Pepper\n    quantity: 4\n    unit: pcs\n  - name: Tomato\n    quantity: 2\n    unit: pcs\n",
    )
    .unwrap();

    larder(&tmp)
        .args(["recipe", "import"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported Lecsó (2 ingredients)"));

    larder(&tmp)
        .args(["recipe", "list", "--count"])
        .assert()
        .success()
        .stdout("2\n");
}

#[test]
fn test_import_invalid_yaml_fails() {
    let tmp = TempDir::new().unwrap();
    let file = tmp.path().join("broken.yaml");
    fs::write(&file, "name: [unclosed\n").unwrap();

    larder(&tmp)
        .args(["recipe", "import"])
        .arg(&file)
        .assert()
        .failure();
}

#[test]
fn test_check_puts_shortages_on_list() {
    let tmp = TempDir::new().unwrap();
    stock_starter(&tmp);
    larder(&tmp)
        .args(["stock", "edit", "onion", "-n", "0"])
        .assert()
        .success();

    larder(&tmp)
        .args(["recipe", "check", STARTER])
        .assert()
        .success()
        .stdout(predicate::str::contains("short of 1 ingredient"))
        .stdout(predicate::str::contains("Onion"));

    let entries = json(&tmp, &["shop", "list"]);
    let entries = entries.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["name"], "Onion");
    assert_eq!(entries[0]["category"], "Vegetables");

    // a second check does not duplicate entries
    larder(&tmp)
        .args(["recipe", "check", STARTER])
        .assert()
        .success()
        .stdout(predicate::str::contains("already on the shopping list"));
}

#[test]
fn test_check_fully_stocked() {
    let tmp = TempDir::new().unwrap();
    stock_starter(&tmp);

    larder(&tmp)
        .args(["recipe", "check", STARTER])
        .assert()
        .success()
        .stdout(predicate::str::contains("is in stock"));
}

#[test]
fn test_cook_deducts_and_prunes() {
    let tmp = TempDir::new().unwrap();
    stock_starter(&tmp);

    larder(&tmp)
        .args(["recipe", "cook", STARTER])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cooked Spaghetti Bolognese"))
        .stdout(predicate::str::contains("Spaghetti is used up"));

    let items = json(&tmp, &["stock", "list"]);
    let names: Vec<&str> = items
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["name"].as_str().unwrap())
        .collect();
    assert!(!names.contains(&"Spaghetti"));
    assert!(names.contains(&"Oil"));
}

#[test]
fn test_cook_blocked_without_force() {
    let tmp = TempDir::new().unwrap();
    add_stock(&tmp, "Spaghetti", "1", "kg");

    larder(&tmp)
        .args(["recipe", "cook", STARTER])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Not enough stock"))
        .stderr(predicate::str::contains("--force"));

    let items = json(&tmp, &["stock", "list"]);
    assert_eq!(items[0]["quantity"], 1.0);
}

#[test]
fn test_cook_with_force_uses_what_is_there() {
    let tmp = TempDir::new().unwrap();
    add_stock(&tmp, "Spaghetti", "1", "kg");

    larder(&tmp)
        .args(["recipe", "cook", STARTER, "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ingredient(s) short"));

    let items = json(&tmp, &["stock", "list"]);
    assert_eq!(items[0]["quantity"], 0.5);
}

#[test]
fn test_inspire_offline() {
    let tmp = TempDir::new().unwrap();
    larder(&tmp)
        .arg("inspire")
        .assert()
        .success()
        .stdout(predicate::str::contains("turned off"));
}

#[test]
fn test_completions_generate() {
    let tmp = TempDir::new().unwrap();
    larder(&tmp)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("larder"));
}
