#![cfg(feature = "serde")]

use okon_tools::{TraceEvent, TraceLog};

#[test]
fn trace_log_json_roundtrip() {
    let log = TraceLog {
        events: vec![
            TraceEvent::new(1, "bt.node.initialise").with_node("Set depth"),
            TraceEvent::new(4, "bt.node.terminate")
                .with_node("Set depth")
                .with_detail("SUCCESS"),
            TraceEvent::new(9, "bt.tree.halt").with_detail("mission complete"),
        ],
    };

    let json = serde_json::to_string(&log).expect("serialize");
    let roundtrip: TraceLog = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(roundtrip, log);
}
