//! Concurrency checks: slow backend calls must not serialize the proxy.

use std::time::{Duration, Instant};

mod common;

use common::*;

#[tokio::test]
async fn slow_requests_run_concurrently() {
    let primary = start_programmable_backend(|| async {
        tokio::time::sleep(Duration::from_millis(500)).await;
        (200, r#"{"ok":true}"#.to_string())
    })
    .await;
    let (decision, _) = start_recording_backend(200, None, "").await;
    let (proxy, _shutdown) = spawn_proxy(proxy_config(primary, decision)).await;

    let concurrency = 10;
    let client = client();
    let start = Instant::now();

    let mut tasks = Vec::new();
    for i in 0..concurrency {
        let client = client.clone();
        let url = format!("http://{}/api/v1/jobs/{}", proxy, i);
        tasks.push(tokio::spawn(async move {
            client.get(&url).send().await.map(|res| res.status().as_u16())
        }));
    }

    let mut ok = 0;
    for task in tasks {
        if let Ok(Ok(200)) = task.await {
            ok += 1;
        }
    }
    let elapsed = start.elapsed();

    println!("{} requests in {:?}", concurrency, elapsed);
    assert_eq!(ok, concurrency);
    assert!(
        elapsed < Duration::from_millis(500 * concurrency as u64 / 2),
        "requests appear serialized: {:?}",
        elapsed
    );
}

#[tokio::test]
async fn static_and_api_traffic_interleave() {
    let primary = start_programmable_backend(|| async {
        tokio::time::sleep(Duration::from_millis(800)).await;
        (200, "{}".to_string())
    })
    .await;
    let (decision, _) = start_recording_backend(200, None, "").await;
    let (proxy, _shutdown) = spawn_proxy(proxy_config(primary, decision)).await;
    let client = client();

    let slow = {
        let client = client.clone();
        let url = format!("http://{}/api/v1/jobs", proxy);
        tokio::spawn(async move { client.get(&url).send().await.map(|r| r.status().as_u16()) })
    };

    tokio::time::sleep(Duration::from_millis(50)).await;
    let start = Instant::now();
    let res = client
        .get(format!("http://{}/index.html", proxy))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert!(start.elapsed() < Duration::from_millis(500));

    assert_eq!(slow.await.unwrap().unwrap(), 200);
}
