//! Integration tests for the per-direction worker pipeline: batches fed
//! through a direction's channel must come out of its sink verbatim, in
//! order, and never cross into the other direction.

use crossbeam_channel::bounded;
use mitmidi::{
    find_endpoint, spawn_relay, Batch, Direction, EndpointInfo, MessageSink, RelayHandler,
    BULK_REQUEST_HIGHLIGHT,
};
use std::io::Write;
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
struct VecSink(Arc<Mutex<Vec<Vec<u8>>>>);

impl VecSink {
    fn messages(&self) -> Vec<Vec<u8>> {
        self.0.lock().unwrap().clone()
    }
}

impl MessageSink for VecSink {
    fn send(&mut self, message: &[u8]) -> mitmidi::Result<()> {
        self.0.lock().unwrap().push(message.to_vec());
        Ok(())
    }
}

#[derive(Clone, Default)]
struct SharedLog(Arc<Mutex<Vec<u8>>>);

impl SharedLog {
    fn text(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for SharedLog {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn worker_forwards_batches_in_fifo_order() {
    let sink = VecSink::default();
    let (tx, rx) = bounded::<Batch>(64);
    let worker = spawn_relay(Direction::SubjectToTarget, sink.clone(), SharedLog::default(), rx);

    let mut expected = Vec::new();
    for i in 0..100u8 {
        let batch = vec![vec![0xB0, i, 0x40]];
        tx.send(batch.clone()).unwrap();
        expected.extend(batch);
    }
    drop(tx);
    worker.join().unwrap();

    assert_eq!(sink.messages(), expected);
}

#[test]
fn directions_never_cross_contaminate() {
    let sink_a = VecSink::default();
    let sink_b = VecSink::default();
    let (a_tx, a_rx) = bounded::<Batch>(64);
    let (b_tx, b_rx) = bounded::<Batch>(64);
    let worker_a = spawn_relay(
        Direction::SubjectToTarget,
        sink_a.clone(),
        SharedLog::default(),
        a_rx,
    );
    let worker_b = spawn_relay(
        Direction::TargetToSubject,
        sink_b.clone(),
        SharedLog::default(),
        b_rx,
    );

    // Interleave deliveries across the two directions.
    for i in 0..50u8 {
        a_tx.send(vec![vec![0xA0, i]]).unwrap();
        b_tx.send(vec![vec![0xB0, i]]).unwrap();
    }
    drop(a_tx);
    drop(b_tx);
    worker_a.join().unwrap();
    worker_b.join().unwrap();

    let a: Vec<_> = (0..50u8).map(|i| vec![0xA0, i]).collect();
    let b: Vec<_> = (0..50u8).map(|i| vec![0xB0, i]).collect();
    assert_eq!(sink_a.messages(), a);
    assert_eq!(sink_b.messages(), b);
}

#[test]
fn resolved_target_receives_logged_and_highlighted_bulk_request() {
    // Full scenario: resolve the real device past the proxy's own
    // decoy port, then relay a bulk request toward it.
    let candidates = vec![
        EndpointInfo {
            index: 0,
            name: "01V96 Proxy IN".to_string(),
        },
        EndpointInfo {
            index: 1,
            name: "01V96 Port1".to_string(),
        },
    ];
    let target = find_endpoint(&candidates, "Port1", "Proxy").unwrap();
    assert_eq!(target.name, "01V96 Port1");

    let sink = VecSink::default();
    let log = SharedLog::default();
    let mut handler = RelayHandler::new(Direction::SubjectToTarget, sink.clone(), log.clone());

    let message = vec![0xF0, 0x43, 0x10, 0x3E, 0x0E, 0xF7];
    handler.handle_batch(&[message.clone()]);

    let expected = format!("SM→MIXER: F0 43 10 3E 0E F7\n{}\n", BULK_REQUEST_HIGHLIGHT);
    assert_eq!(log.text(), expected);
    assert_eq!(sink.messages(), vec![message]);
}
