use backupctl::{
    kubernetes::{
        resources::backup_job_resource, ClusterSource, KubeSource, ResourceQuery, BACKUP_JOB_RESOURCE,
    },
    Error,
};
use hyper::{Body, Request, Response, Uri};
use kube::Client;
use serde_json::{json, Value};
use tokio::task::JoinHandle;
use tower_test::mock::Handle;

const NAMESPACED_PATH: &str = "/apis/dataprotection.kubeblocks.io/v1alpha1/namespaces/demo/backupjobs";
const CLUSTER_PATH: &str = "/apis/dataprotection.kubeblocks.io/v1alpha1/backupjobs";

type ApiServer = Handle<Request<Body>, Response<Body>>;

fn mock_source() -> (KubeSource, ApiServer) {
    let (service, handle) = tower_test::mock::pair::<Request<Body>, Response<Body>>();
    (KubeSource::new(Client::new(service, "demo")), handle)
}

/// Answer requests in order with `responses`, returning the URIs requested.
fn serve(mut handle: ApiServer, responses: Vec<(u16, Value)>) -> JoinHandle<Vec<Uri>> {
    tokio::spawn(async move {
        let mut uris = Vec::new();
        for (status, body) in responses {
            let (request, send) = handle.next_request().await.expect("client sent a request");
            uris.push(request.uri().clone());
            send.send_response(
                Response::builder()
                    .status(status)
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            );
        }
        uris
    })
}

fn metadata_page(items: &[(&str, &str)], continue_token: Option<&str>) -> Value {
    let items: Vec<Value> = items
        .iter()
        .map(|(namespace, name)| {
            json!({
                "apiVersion": "meta.k8s.io/v1",
                "kind": "PartialObjectMetadata",
                "metadata": {"name": name, "namespace": namespace}
            })
        })
        .collect();
    json!({
        "apiVersion": "meta.k8s.io/v1",
        "kind": "PartialObjectMetadataList",
        "metadata": {"continue": continue_token},
        "items": items
    })
}

fn not_found(name: &str) -> Value {
    json!({
        "apiVersion": "v1",
        "kind": "Status",
        "metadata": {},
        "status": "Failure",
        "message": format!("backupjobs.dataprotection.kubeblocks.io \"{}\" not found", name),
        "reason": "NotFound",
        "details": {"name": name, "group": "dataprotection.kubeblocks.io", "kind": "backupjobs"},
        "code": 404
    })
}

fn query(namespace: &str, chunk_size: u32) -> ResourceQuery {
    ResourceQuery {
        resource_type: BACKUP_JOB_RESOURCE.to_string(),
        namespace: namespace.to_string(),
        chunk_size,
        ..Default::default()
    }
}

#[tokio::test]
async fn chunked_list_follows_continue_tokens() {
    let (source, handle) = mock_source();
    let server = serve(
        handle,
        vec![
            (200, metadata_page(&[("demo", "j0")], Some("tok1"))),
            (200, metadata_page(&[("demo", "j1")], None)),
        ],
    );

    let refs = source.resolve(&query("demo", 1)).await.unwrap();
    drop(source);
    let uris = server.await.unwrap();

    let names: Vec<_> = refs.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["j0", "j1"]);
    assert!(refs.iter().all(|r| r.namespace == "demo" && r.kind == "BackupJob"));

    assert_eq!(uris.len(), 2);
    assert_eq!(uris[0].path(), NAMESPACED_PATH);
    let first = uris[0].query().unwrap_or_default();
    assert!(first.contains("limit=1"), "{}", first);
    assert!(!first.contains("continue="), "{}", first);
    let second = uris[1].query().unwrap_or_default();
    assert!(second.contains("limit=1"), "{}", second);
    assert!(second.contains("continue=tok1"), "{}", second);
}

#[tokio::test]
async fn zero_chunk_size_lists_in_one_request() {
    let (source, handle) = mock_source();
    let server = serve(
        handle,
        vec![(200, metadata_page(&[("demo", "a"), ("demo", "b"), ("demo", "c")], None))],
    );

    let refs = source.resolve(&query("demo", 0)).await.unwrap();
    drop(source);
    let uris = server.await.unwrap();

    assert_eq!(refs.len(), 3);
    assert_eq!(uris.len(), 1);
    assert_eq!(uris[0].path(), NAMESPACED_PATH);
    assert!(!uris[0].query().unwrap_or_default().contains("limit"));
}

#[tokio::test]
async fn all_namespaces_lists_across_the_cluster() {
    let (source, handle) = mock_source();
    let server = serve(
        handle,
        vec![(200, metadata_page(&[("team-a", "x"), ("team-b", "y")], None))],
    );

    let all = ResourceQuery {
        all_namespaces: true,
        ..query("demo", 500)
    };
    let refs = source.resolve(&all).await.unwrap();
    drop(source);
    let uris = server.await.unwrap();

    assert_eq!(uris[0].path(), CLUSTER_PATH);
    let placed: Vec<_> = refs.iter().map(|r| (r.namespace.as_str(), r.name.as_str())).collect();
    assert_eq!(placed, vec![("team-a", "x"), ("team-b", "y")]);
}

#[tokio::test]
async fn missing_names_are_reported_together() {
    let (source, handle) = mock_source();
    let server = serve(handle, vec![(404, not_found("x")), (404, not_found("y"))]);

    let named = ResourceQuery {
        names: vec!["x".to_string(), "y".to_string()],
        ..query("demo", 500)
    };
    let result = source.resolve(&named).await;
    drop(source);
    let uris = server.await.unwrap();

    let paths: Vec<_> = uris.iter().map(|u| u.path().to_string()).collect();
    assert_eq!(
        paths,
        vec![format!("{}/x", NAMESPACED_PATH), format!("{}/y", NAMESPACED_PATH)]
    );
    match result {
        Err(Error::Aggregate(errors)) => {
            assert_eq!(errors.len(), 2);
            assert_eq!(
                errors.to_string(),
                "[backupjobs.dataprotection.kubeblocks.io \"x\" not found, \
                 backupjobs.dataprotection.kubeblocks.io \"y\" not found]"
            );
        }
        other => panic!("expected an aggregate error, got {:?}", other),
    }
}

#[tokio::test]
async fn invalid_queries_never_reach_the_server() {
    let (source, handle) = mock_source();
    let server = serve(handle, vec![]);

    let by_name_everywhere = ResourceQuery {
        names: vec!["x".to_string()],
        all_namespaces: true,
        ..query("demo", 500)
    };
    assert!(matches!(
        source.resolve(&by_name_everywhere).await,
        Err(Error::Validation(_))
    ));

    let wrong_type = ResourceQuery {
        resource_type: "pods".to_string(),
        ..query("demo", 500)
    };
    assert!(matches!(source.resolve(&wrong_type).await, Err(Error::Validation(_))));

    drop(source);
    assert!(server.await.unwrap().is_empty());
}

#[tokio::test]
async fn fetch_reads_the_full_object_from_its_namespace() {
    let (source, handle) = mock_source();
    let server = serve(
        handle,
        vec![(
            200,
            json!({
                "apiVersion": "dataprotection.kubeblocks.io/v1alpha1",
                "kind": "BackupJob",
                "metadata": {"name": "y", "namespace": "team-b"},
                "status": {"phase": "Completed"}
            }),
        )],
    );

    let obj = source
        .fetch(&backup_job_resource(), "team-b", "y")
        .await
        .unwrap();
    drop(source);
    let uris = server.await.unwrap();

    assert_eq!(
        uris[0].path(),
        "/apis/dataprotection.kubeblocks.io/v1alpha1/namespaces/team-b/backupjobs/y"
    );
    assert_eq!(obj.metadata.name.as_deref(), Some("y"));
    assert_eq!(obj.data["status"]["phase"], "Completed");
}
