use neofs_push::neofs_cli::{rpc_endpoint, NeofsCli, NetworkConfig, PASSWORD_ENV};
use neofs_push_core::attributes::AttributeSet;
use neofs_push_core::contract::{ObjectId, PutRequest, StorageClient};
use neofs_push_core::executor::{CommandOutput, CommandSpec, MockCommandRunner};
use neofs_push_core::PublishError;
use std::path::PathBuf;
use std::time::Duration;

fn network() -> NetworkConfig {
    NetworkConfig {
        endpoint: rpc_endpoint("st1.storage.fs.neo.org"),
        wallet: "/secrets/wallet.json".into(),
        container_id: "CID".into(),
    }
}

fn ok(stdout: &str) -> CommandOutput {
    CommandOutput {
        code: 0,
        stdout: stdout.into(),
        stderr: String::new(),
    }
}

fn wallet_prefix() -> Vec<String> {
    ["--rpc-endpoint", "st1.storage.fs.neo.org:8080", "--wallet", "/secrets/wallet.json"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn with_prefix(rest: &[&str]) -> Vec<String> {
    let mut args = wallet_prefix();
    args.extend(rest.iter().map(|s| s.to_string()));
    args
}

#[test]
fn endpoint_uses_port_8080() {
    assert_eq!(rpc_endpoint("st1.storage.fs.neo.org"), "st1.storage.fs.neo.org:8080");
}

#[tokio::test]
async fn epoch_query_needs_no_wallet() {
    let mut runner = MockCommandRunner::new();
    runner
        .expect_run()
        .withf(|spec: &CommandSpec, _| {
            spec.program == "neofs-cli"
                && spec.args == ["netmap", "epoch", "--rpc-endpoint", "st1.storage.fs.neo.org:8080"]
        })
        .returning(|_, _| Ok(ok("4242\n")));

    let client = NeofsCli::with_runner(runner, network(), None);
    assert_eq!(client.current_epoch().await.unwrap(), 4242);
}

#[tokio::test]
async fn garbage_epoch_is_unparseable() {
    let mut runner = MockCommandRunner::new();
    runner.expect_run().returning(|_, _| Ok(ok("rpc unavailable")));

    let client = NeofsCli::with_runner(runner, network(), None);
    assert!(matches!(
        client.current_epoch().await,
        Err(PublishError::UnparseableOutput { .. })
    ));
}

#[tokio::test]
async fn put_builds_argv_with_expiration_and_password_env() {
    let mut runner = MockCommandRunner::new();
    runner
        .expect_run()
        .withf(|spec: &CommandSpec, timeout: &Duration| {
            spec.args
                == with_prefix(&[
                    "object",
                    "put",
                    "--cid",
                    "CID",
                    "--timeout",
                    "30s",
                    "--no-progress",
                    "--expire-at",
                    "110",
                    "--file",
                    "/site/a b.txt",
                    "--attributes",
                    "FilePath=site/a b.txt,Content-Type=text/plain",
                ])
                && spec.envs == vec![(PASSWORD_ENV.to_string(), "pw".to_string())]
                && *timeout == Duration::from_secs(30)
        })
        .returning(|_, _| {
            Ok(ok("[/site/a b.txt] Object successfully stored\n  OID: 7Xyz\n  CID: CID\n"))
        });

    let client = NeofsCli::with_runner(runner, network(), Some("pw".into()));
    let req = PutRequest {
        file: PathBuf::from("/site/a b.txt"),
        attributes: AttributeSet::compile("site/a b.txt", Some("text/plain"), None).unwrap(),
        expire_at: Some(110),
        timeout: Duration::from_secs(30),
    };
    assert_eq!(client.put_object(&req).await.unwrap(), Some(ObjectId::new("7Xyz")));
}

#[tokio::test]
async fn put_without_expiration_omits_flag() {
    let mut runner = MockCommandRunner::new();
    runner
        .expect_run()
        .withf(|spec: &CommandSpec, _| {
            !spec.args.iter().any(|a| a == "--expire-at") && spec.envs.is_empty()
        })
        .returning(|_, _| Ok(ok("stored\n")));

    let client = NeofsCli::with_runner(runner, network(), None);
    let req = PutRequest {
        file: PathBuf::from("/site/a.txt"),
        attributes: AttributeSet::compile("a.txt", None, None).unwrap(),
        expire_at: None,
        timeout: Duration::from_secs(600),
    };
    assert_eq!(client.put_object(&req).await.unwrap(), None);
}

#[tokio::test]
async fn search_drops_summary_line() {
    let mut runner = MockCommandRunner::new();
    runner
        .expect_run()
        .withf(|spec: &CommandSpec, timeout: &Duration| {
            spec.args
                == with_prefix(&[
                    "object",
                    "search",
                    "--cid",
                    "CID",
                    "--filters",
                    "FilePath EQ a/b.txt",
                ])
                && *timeout == Duration::from_secs(120)
        })
        .returning(|_, _| Ok(ok("Found 2 objects.\nOID1\nOID2\n")));

    let client = NeofsCli::with_runner(runner, network(), None);
    let found = client.search_objects("FilePath EQ a/b.txt").await.unwrap();
    assert_eq!(found, vec![ObjectId::new("OID1"), ObjectId::new("OID2")]);
}

#[tokio::test]
async fn list_and_delete_target_the_container() {
    let mut runner = MockCommandRunner::new();
    runner
        .expect_run()
        .withf(|spec: &CommandSpec, _| {
            spec.args == with_prefix(&["container", "list-objects", "--cid", "CID"])
        })
        .returning(|_, _| Ok(ok("A\nB\n\n")));
    runner
        .expect_run()
        .withf(|spec: &CommandSpec, timeout: &Duration| {
            spec.args == with_prefix(&["object", "delete", "--cid", "CID", "--oid", "A"])
                && *timeout == Duration::from_secs(5)
        })
        .returning(|_, _| Ok(ok("Object removed successfully.\n")));

    let client = NeofsCli::with_runner(runner, network(), None)
        .command_timeout(Duration::from_secs(5));
    let listed = client.list_objects().await.unwrap();
    assert_eq!(listed, vec![ObjectId::new("A"), ObjectId::new("B")]);
    client.delete_object(&listed[0]).await.unwrap();
}

#[tokio::test]
async fn custom_program_is_used() {
    let mut runner = MockCommandRunner::new();
    runner
        .expect_run()
        .withf(|spec: &CommandSpec, _| spec.program == "/opt/neofs/bin/neofs-cli")
        .returning(|_, _| Ok(ok("")));

    let client = NeofsCli::with_runner(runner, network(), None).program("/opt/neofs/bin/neofs-cli");
    assert!(client.list_objects().await.unwrap().is_empty());
}

#[tokio::test]
async fn listing_output_is_trimmed_and_summary_free() {
    let mut runner = MockCommandRunner::new();
    runner
        .expect_run()
        .times(1)
        .returning(|_, _| Ok(ok("Found 2 objects.\n  A  \n\n\tB\n")));

    let client = NeofsCli::with_runner(runner, network(), None);
    assert_eq!(
        client.list_objects().await.unwrap(),
        vec![ObjectId::new("A"), ObjectId::new("B")]
    );
}
