//! `--list` output against a fake terraform.

use predicates::prelude::*;
use serde_json::{Value, json};
use std::fs;

use crate::common::{TestProject, sample_state};

fn list(project: &TestProject) -> Value {
    let output = project.cmd().arg("--list").assert().success();
    serde_json::from_slice(&output.get_output().stdout).unwrap()
}

#[test]
fn test_list_hosts_vars_and_groups() {
    let project = TestProject::new().unwrap();
    project.install_state(&sample_state()).unwrap();
    project.write_default_config("").unwrap();

    let inventory = list(&project);

    let web = &inventory["_meta"]["hostvars"]["aws_instance.webserver"];
    assert_eq!(web["ansible_host"], "3.144.148.143");
    assert_eq!(web["root_block_device_0_volume_size"], 8);
    assert_eq!(web["tags_all_Name"], "webserver-tf");
    assert!(web.get("host_id").is_none());

    assert_eq!(inventory["tag_Name_webserver_tf"]["hosts"], json!(["aws_instance.webserver"]));
    assert_eq!(inventory["tag_Name_dbserver_tf"]["hosts"], json!(["aws_instance.dbserver"]));
    assert_eq!(
        inventory["tag_Contact_ops_example_com"]["hosts"],
        json!(["aws_instance.webserver"])
    );
    assert_eq!(inventory["tag_AlwaysUp_false"]["hosts"], json!(["aws_instance.dbserver"]));
    assert_eq!(inventory["ungrouped"]["hosts"], json!([]));

    // The subnet has no public_ip, so it is not a host.
    assert!(inventory["_meta"]["hostvars"].get("aws_subnet.main").is_none());

    assert_eq!(project.invocations(), ["init", "show -json"]);
}

#[test]
fn test_list_is_the_default_mode() {
    let project = TestProject::new().unwrap();
    project.install_state(&sample_state()).unwrap();
    project.write_default_config("").unwrap();

    let output = project.cmd().assert().success();
    let inventory: Value = serde_json::from_slice(&output.get_output().stdout).unwrap();
    assert!(inventory["_meta"]["hostvars"].get("aws_instance.dbserver").is_some());
}

#[test]
fn test_config_from_environment_variable() {
    let project = TestProject::new().unwrap();
    project.install_state(&sample_state()).unwrap();
    let config = project.write_default_config("").unwrap();
    let elsewhere = project.root().join("renamed.yml");
    fs::rename(&config, &elsewhere).unwrap();

    project
        .cmd()
        .env("TFSTATE_INVENTORY_CONFIG", &elsewhere)
        .arg("--list")
        .assert()
        .success()
        .stdout(predicate::str::contains("aws_instance.webserver"));
}

#[test]
fn test_filters() {
    let project = TestProject::new().unwrap();
    project.install_state(&sample_state()).unwrap();
    project
        .write_default_config(
            "type_list: aws_instance\naddress_list: ['server$']\ntag_list:\n  - Name: '^web'\n",
        )
        .unwrap();

    let inventory = list(&project);
    let hostvars = inventory["_meta"]["hostvars"].as_object().unwrap();
    assert_eq!(hostvars.keys().collect::<Vec<_>>(), ["aws_instance.webserver"]);
    assert!(inventory.get("tag_Name_dbserver_tf").is_none());
}

#[test]
fn test_access_param_order() {
    let project = TestProject::new().unwrap();
    project.install_state(&sample_state()).unwrap();
    project.write_default_config("access_param: [private_ip, public_ip]\n").unwrap();

    let inventory = list(&project);
    let hostvars = &inventory["_meta"]["hostvars"];
    assert_eq!(hostvars["aws_instance.webserver"]["ansible_host"], "10.0.1.20");
    assert_eq!(hostvars["aws_instance.dbserver"]["ansible_host"], "18.191.55.12");
}

#[test]
fn test_remote_state_backend() {
    let project = TestProject::new().unwrap();
    project.install_state(&sample_state()).unwrap();
    project
        .write_config(&format!(
            "project_path:\n  - path: {}\n    remote_state:\n      type: s3\n      key: k\n      bucket: b\nbinary_path: {}\n",
            project.workspace().display(),
            project.terraform().display()
        ))
        .unwrap();

    project.cmd().arg("--list").assert().success();

    assert_eq!(
        project.invocations(),
        ["init -backend-config key=k -backend-config bucket=b", "show -json"]
    );
    assert_eq!(
        fs::read_to_string(project.workspace().join("backend_s3.tf")).unwrap(),
        "terraform {\n    backend \"s3\" {}\n}\n"
    );
}

#[test]
fn test_pretty_output() {
    let project = TestProject::new().unwrap();
    project.install_state(&json!({"values": {}})).unwrap();
    project.write_default_config("").unwrap();

    project
        .cmd()
        .args(["--list", "--pretty"])
        .assert()
        .success()
        .stdout(predicate::str::contains("{\n  \"_meta\": {"));
}

#[test]
fn test_logs_stay_off_stdout() {
    let project = TestProject::new().unwrap();
    project.install_state(&sample_state()).unwrap();
    project.write_default_config("").unwrap();

    let output = project.cmd().args(["--list", "--verbose"]).assert().success();
    let stdout = &output.get_output().stdout;
    assert!(serde_json::from_slice::<Value>(stdout).is_ok());

    let stderr = String::from_utf8_lossy(&output.get_output().stderr);
    assert!(stderr.contains("Skipping aws_subnet.main"));
}

#[test]
fn test_hosts_from_every_workspace() {
    let project = TestProject::new().unwrap();
    project.install_state(&json!({"values": {}})).unwrap();
    let app = project
        .add_workspace(
            "app",
            &json!({"values": {"root_module": {"resources": [{
                "address": "aws_instance.app",
                "type": "aws_instance",
                "values": {"public_ip": "3.3.3.3", "tags_all": {"Tier": "app"}}
            }]}}}),
        )
        .unwrap();
    let db = project
        .add_workspace(
            "db",
            &json!({"values": {"root_module": {"resources": [{
                "address": "aws_instance.db",
                "type": "aws_instance",
                "values": {"public_ip": "4.4.4.4", "tags_all": {"Tier": "db"}}
            }]}}}),
        )
        .unwrap();
    project
        .write_config(&format!(
            "project_path: [{}, {}]\nbinary_path: {}\n",
            app.display(),
            db.display(),
            project.terraform().display()
        ))
        .unwrap();

    let inventory = list(&project);
    let hostvars = &inventory["_meta"]["hostvars"];
    assert_eq!(hostvars["aws_instance.app"]["ansible_host"], "3.3.3.3");
    assert_eq!(hostvars["aws_instance.db"]["ansible_host"], "4.4.4.4");
    assert_eq!(inventory["tag_Tier_app"]["hosts"], json!(["aws_instance.app"]));
    assert_eq!(inventory["tag_Tier_db"]["hosts"], json!(["aws_instance.db"]));

    assert_eq!(project.invocations(), ["init", "show -json", "init", "show -json"]);
}
