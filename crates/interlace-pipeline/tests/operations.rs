//! End-to-end operation driver tests against the in-memory adapter.

use interlace_core::{InterlaceError, RequestArgs, Stage, Verb};
use interlace_pipeline::fixtures::MemoryAdapter;
use interlace_pipeline::Endpoint;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

fn seeded_users() -> MemoryAdapter {
    let adapter = MemoryAdapter::new();
    adapter.seed(json!({"id": 1, "first_name": "Alice", "account_id": 9}));
    adapter.seed(json!({"id": 2, "first_name": "Bob", "account_id": 9}));
    adapter
}

#[tokio::test]
async fn read_replaces_query_and_guards_fetched_id() {
    let endpoint = Endpoint::builder(seeded_users())
        .resource("User")
        .on(Stage::PreFetch, "ignore_this_query", |_, _, _, _| {
            Ok(json!({"user_id": 1}))
        })
        .on(Stage::PostFetch, "raise_if_not_first_user", |_, value, _, _| {
            if value["id"] == json!(1) {
                Ok(value)
            } else {
                Err(InterlaceError::hook(
                    Stage::PostFetch,
                    "raise_if_not_first_user",
                    "you're not the first user",
                ))
            }
        })
        .build()
        .unwrap();

    let args = RequestArgs::new();

    let first = endpoint.read("1", &args).await.unwrap();
    assert_eq!(first["data"]["first_name"], json!("Alice"));

    let err = endpoint.read("2", &args).await.unwrap_err();
    assert!(matches!(err, InterlaceError::Hook { stage: Stage::PostFetch, .. }));
}

#[tokio::test]
async fn read_missing_id_is_not_found() {
    let endpoint = Endpoint::builder(seeded_users())
        .resource("User")
        .build()
        .unwrap();

    let err = endpoint.read("99", &RequestArgs::new()).await.unwrap_err();
    match err {
        InterlaceError::NotFound { resource, id } => {
            assert_eq!(resource, "User");
            assert_eq!(id, "99");
        }
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn read_all_dumps_the_collection() {
    let endpoint = Endpoint::builder(seeded_users()).build().unwrap();

    let out = endpoint.read_all(&RequestArgs::new()).await.unwrap();
    assert_eq!(out["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn create_pre_load_mutates_raw_input_before_load() {
    let endpoint = Endpoint::builder(MemoryAdapter::new())
        .on(Stage::PreLoad, "set_first_name", |_, mut value, _, _| {
            value["first_name"] = json!("George");
            Ok(value)
        })
        .build()
        .unwrap();

    let created = endpoint
        .create(json!({"last_name": "Micheal"}), &RequestArgs::new())
        .await
        .unwrap();

    assert_eq!(created["data"]["first_name"], json!("George"));
    assert_eq!(created["data"]["last_name"], json!("Micheal"));

    let stored = endpoint.state().get("1").unwrap();
    assert_eq!(stored["first_name"], json!("George"));
}

#[tokio::test]
async fn update_runs_side_action_only_when_context_flag_set() {
    let tasks: Arc<Mutex<Vec<Value>>> = Arc::new(Mutex::new(Vec::new()));
    let task_log = Arc::clone(&tasks);

    let endpoint = Endpoint::builder(seeded_users())
        .resource("User")
        .on(Stage::PostLoad, "set_run_task", |_, mut value, ctx, _| {
            if let Some(flag) = value.as_object_mut().and_then(|m| m.remove("should_run_task")) {
                ctx.set("run_task", flag);
            }
            Ok(value)
        })
        .on(Stage::PreSave, "belongs_to_account", |_, mut value, _, _| {
            value["account_id"] = json!(1);
            Ok(value)
        })
        .on(Stage::PostSave, "run_task_from_previous_operation", move |_, value, ctx, _| {
            if ctx.get("run_task") == Some(&json!(true)) {
                task_log.lock().unwrap().push(value["id"].clone());
            }
            Ok(value)
        })
        .build()
        .unwrap();

    let args = RequestArgs::new();

    let updated = endpoint
        .update(
            "1",
            json!({"first_name": "Updated", "should_run_task": true}),
            &args,
        )
        .await
        .unwrap();

    assert_eq!(updated["data"]["first_name"], json!("Updated"));
    assert_eq!(updated["data"]["account_id"], json!(1));
    assert_eq!(*tasks.lock().unwrap(), vec![json!(1)]);

    endpoint
        .update(
            "2",
            json!({"first_name": "Still Bob", "should_run_task": false}),
            &args,
        )
        .await
        .unwrap();

    // The flag was falsy, so the side action did not fire again.
    assert_eq!(tasks.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn partial_update_merges_onto_existing_value() {
    let endpoint = Endpoint::builder(seeded_users()).build().unwrap();

    let out = endpoint
        .partial_update("2", json!({"first_name": "Robert"}), &RequestArgs::new())
        .await
        .unwrap();

    assert_eq!(out["data"]["first_name"], json!("Robert"));
    // Untouched fields survive the merge.
    assert_eq!(out["data"]["account_id"], json!(9));
}

#[tokio::test]
async fn delete_never_invokes_post_save_hooks() {
    let post_saves = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&post_saves);

    let endpoint = Endpoint::builder(seeded_users())
        .on(Stage::PostSave, "count_post_save", move |_, value, _, _| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(value)
        })
        .build()
        .unwrap();

    let args = RequestArgs::new();
    endpoint.delete("1", &args).await.unwrap();

    assert_eq!(post_saves.load(Ordering::SeqCst), 0);
    assert!(endpoint.state().get("1").is_none());
    assert_eq!(endpoint.state().deleted().len(), 1);

    // The same hook does fire for write verbs.
    endpoint.create(json!({"first_name": "New"}), &args).await.unwrap();
    assert_eq!(post_saves.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn delete_missing_id_is_not_found() {
    let endpoint = Endpoint::builder(seeded_users()).build().unwrap();

    let err = endpoint.delete("99", &RequestArgs::new()).await.unwrap_err();
    assert!(matches!(err, InterlaceError::NotFound { .. }));
}

#[tokio::test]
async fn archive_mutates_designated_field_before_save() {
    let pre_save_saw = Arc::new(Mutex::new(Vec::new()));
    let saw = Arc::clone(&pre_save_saw);

    let endpoint = Endpoint::builder(seeded_users())
        .on(Stage::PreSave, "observe", move |_, value, _, _| {
            saw.lock().unwrap().push(value.clone());
            Ok(value)
        })
        .build()
        .unwrap();

    endpoint.archive("1", &RequestArgs::new()).await.unwrap();

    // pre_save hooks ran on the unarchived value; the stored value
    // carries the archive mark, so the mutation happened before save.
    assert_eq!(pre_save_saw.lock().unwrap()[0]["is_archived"], Value::Null);
    let stored = endpoint.state().get("1").unwrap();
    assert_eq!(stored["is_archived"], json!(true));
    assert_eq!(stored["first_name"], json!("Alice"));
    assert!(endpoint.state().deleted().is_empty());
}

#[tokio::test]
async fn archive_rejects_non_object_values() {
    let endpoint = Endpoint::builder(seeded_users())
        .on(Stage::PreSave, "replace_with_list", |_, _, _, _| {
            Ok(json!([1, 2]))
        })
        .build()
        .unwrap();

    let err = endpoint.archive("1", &RequestArgs::new()).await.unwrap_err();
    assert!(matches!(err, InterlaceError::Collaborator { .. }));
    // Nothing was persisted: the stored object is untouched.
    assert_eq!(endpoint.state().get("1").unwrap()["is_archived"], Value::Null);
}

#[tokio::test]
async fn archive_honors_custom_policy() {
    let endpoint = Endpoint::builder(seeded_users())
        .archive_field("state", json!("archived"))
        .build()
        .unwrap();

    endpoint.archive("2", &RequestArgs::new()).await.unwrap();
    assert_eq!(endpoint.state().get("2").unwrap()["state"], json!("archived"));
}

#[test]
fn archive_shares_delete_external_contract() {
    assert_eq!(Verb::Archive.http_method(), Verb::Delete.http_method());
    assert_eq!(Verb::Archive.status_code(), Verb::Delete.status_code());
    assert_eq!(Verb::Delete.http_method(), http::Method::DELETE);
    assert_eq!(Verb::Delete.status_code(), http::StatusCode::NO_CONTENT);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_invocations_get_isolated_contexts() {
    let endpoint = Endpoint::builder(MemoryAdapter::new())
        .on(Stage::PostLoad, "stash_marker", |_, value, ctx, _| {
            ctx.set("marker", value["marker"].clone());
            Ok(value)
        })
        .on(Stage::PostSave, "check_marker", |_, value, ctx, _| {
            if ctx.get("marker") == Some(&value["marker"]) {
                Ok(value)
            } else {
                Err(InterlaceError::hook(
                    Stage::PostSave,
                    "check_marker",
                    "context leaked between invocations",
                ))
            }
        })
        .build()
        .unwrap();

    let endpoint = Arc::new(endpoint);
    let mut handles = Vec::new();
    for marker in 0..32 {
        let endpoint = Arc::clone(&endpoint);
        handles.push(tokio::spawn(async move {
            endpoint
                .create(json!({"marker": marker}), &RequestArgs::new())
                .await
        }));
    }

    for handle in handles {
        handle.await.unwrap().unwrap();
    }
    assert_eq!(endpoint.state().len(), 32);
}
