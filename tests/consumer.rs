use std::collections::HashSet;

use f5_statsd::Config;
use f5_statsd::consumer::Consumer;
use f5_statsd::event::read_events;
use f5_statsd::sinks::{StatsdSink, WriteSink};
use tokio::net::UdpSocket;

fn events() -> String {
    format!(
        r#"{{"type": "AVR", "data": {{"hostname": "bigip1", "hits": 10}}}}
{{"type": "systemInfo", "data": {}}}
"#,
        include_str!("fixtures/system_info.json")
    )
}

#[tokio::test]
async fn udp_end_to_end() {
    let server = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let port = server.local_addr().unwrap().port();
    let config = Config::from_yaml(&format!(
        "host: 127.0.0.1\nport: {port}\naddTags:\n  method: sibling\n"
    ))
    .unwrap();

    let sink = StatsdSink::connect(&config).await.unwrap();
    let mut consumer = Consumer::new(config.flatten_options(), sink);

    let input = events();
    let mut total = 0;
    for event in read_events(input.as_bytes()) {
        total += consumer.process(&event.unwrap()).await.unwrap();
    }
    assert_eq!(total, 17);

    let mut received = HashSet::new();
    let mut buf = [0u8; 1024];
    for _ in 0..total {
        let n = server.recv(&mut buf).await.unwrap();
        received.insert(String::from_utf8(buf[..n].to_vec()).unwrap());
    }

    assert!(received.contains(
        "f5telemetry.bigip1-example-com.pools.-Common-pool1.members.-Common-10-0-0-2-80.serverside-curConns:3|g|#addr:10.0.0.2,monitorStatus:up,poolName:/Common/pool1"
    ));
    assert!(received.contains(
        "f5telemetry.bigip1-example-com.telemetryServiceInfo.pollingInterval:60|g|#cycleEnd:2024-01-01T00:00:01.000Z,cycleStart:2024-01-01T00:00:00.000Z"
    ));
}

#[tokio::test]
async fn udp_daemon_down() {
    let port = {
        let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        socket.local_addr().unwrap().port()
    };
    let config = Config::from_yaml(&format!("host: 127.0.0.1\nport: {port}\n")).unwrap();

    let sink = StatsdSink::connect(&config).await.unwrap();
    let mut consumer = Consumer::new(config.flatten_options(), sink);

    // refused datagrams are lost, every event still goes through
    let input = events();
    for _ in 0..2 {
        let mut total = 0;
        for event in read_events(input.as_bytes()) {
            total += consumer.process(&event.unwrap()).await.unwrap();
        }
        assert_eq!(total, 17);

        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
}

#[tokio::test]
async fn dry_run_output() {
    let config = Config::from_yaml("host: localhost\nport: 8125\nconvertBooleansToMetrics: true").unwrap();
    let mut consumer = Consumer::new(config.flatten_options(), WriteSink::new(Vec::new()));

    let input = events();
    for event in read_events(input.as_bytes()) {
        consumer.process(&event.unwrap()).await.unwrap();
    }

    let written = String::from_utf8(consumer.into_sink().into_inner()).unwrap();
    let lines = written.lines().collect::<Vec<_>>();

    assert_eq!(lines.len(), 20);
    assert_eq!(lines[0], "f5telemetry.bigip1-example-com.system.cpu:12|g");
    assert!(lines.contains(&"f5telemetry.bigip1-example-com.system.configReady:1|g"));
    assert!(lines.iter().all(|line| !line.contains("|#")));
}
