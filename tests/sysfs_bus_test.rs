use wirenode::domain::model::Outcome;
use wirenode::domain::ports::WireBus;
use wirenode::{Engine, Request, ResolvedSettings, SysfsBus, TracingEvents, WireError};

use std::time::Duration;
use tempfile::TempDir;

fn fake_bus_tree() -> TempDir {
    let dir = TempDir::new().unwrap();
    let device = dir.path().join("28-0000075a2b1c");
    std::fs::create_dir(&device).unwrap();
    std::fs::write(device.join("temperature"), "21563\n").unwrap();
    let port = dir.path().join("3a-00000013f2d5");
    std::fs::create_dir(&port).unwrap();
    std::fs::write(port.join("state"), [0x4Bu8]).unwrap();
    std::fs::write(port.join("output"), [0x03u8]).unwrap();
    dir
}

#[tokio::test]
async fn test_read_and_write_device_files() {
    let dir = fake_bus_tree();
    let bus = SysfsBus::new(dir.path().to_str().unwrap());

    let bytes = bus.read_bytes("28-0000075a2b1c/temperature").await.unwrap();
    assert_eq!(bytes, b"21563\n");

    bus.write_bytes("3a-00000013f2d5/output", &[0x02]).await.unwrap();
    let written = std::fs::read(dir.path().join("3a-00000013f2d5/output")).unwrap();
    assert_eq!(written, [0x02]);
}

#[tokio::test]
async fn test_missing_device_is_an_io_error() {
    let dir = fake_bus_tree();
    let bus = SysfsBus::new(dir.path().to_str().unwrap());

    let err = bus.read_bytes("10-000000000000/temperature").await.unwrap_err();
    assert!(matches!(err, WireError::IoError(_)));
}

#[tokio::test]
async fn test_engine_runs_against_the_filesystem() {
    let dir = fake_bus_tree();
    let bus = SysfsBus::new(dir.path().to_str().unwrap());
    let settings = ResolvedSettings {
        identifier: None,
        delay: Duration::ZERO,
        celsius: false,
    };
    let engine = Engine::new(bus, settings, TracingEvents);

    let reply = engine
        .run(Request {
            topic: Some("28-0000075A2B1C".to_string()), // engine lowercases
            label: None,
            payload: None,
            fahrenheit: false,
        })
        .await;

    let message = match reply.outcome {
        Outcome::Success(m) => m,
        other => panic!("expected success, got {other:?}"),
    };
    assert!((message.payload.as_f64().unwrap() - 21.563).abs() < 1e-9);
    assert_eq!(message.sn, "28-0000075a2b1c");
}
