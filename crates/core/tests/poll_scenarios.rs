//! End-to-end poll scenarios against a scripted transport.
//!
//! These tests drive a [`PollScheduler`] over a [`MockTransport`] and check
//! what ends up on a [`MemorySurface`]:
//! - Status to control visibility for each lifecycle stage
//! - Console rendering in entries and file mode
//! - Failure handling and retry on the next tick
//! - Non-overlapping ticks, early polls and shutdown

mod common;

use common::*;
use pw_core::config::models::PageConfig;
use pw_core::scheduler::state::PollPhase;
use pw_core::scheduler::PollScheduler;
use pw_core::surface::MemorySurface;
use pw_core::transport::{MockTransport, TransportError};
use pw_protocol::{Op, StatusResponse, UiRefs};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};

#[tokio::test]
async fn test_ready_shows_start_and_profiles() {
    let transport = MockTransport::new();
    transport.respond(STATUS_URL, status_with_log(0, &[]));
    let mut scheduler = scheduler(&page_config(), &transport);

    scheduler.tick().await;

    let ui = UiRefs::legacy();
    let surface = scheduler.surface();
    assert_eq!(surface.text(&ui.status_message), Some("Ready to start"));
    assert_controls(surface, &ui, true, false, true);
    assert!(surface.element(&ui.console_output).is_none());
}

#[tokio::test]
async fn test_running_renders_log_entries() {
    let transport = MockTransport::new();
    transport.respond(STATUS_URL, status_with_log(1, &[("10:00", "starting")]));
    let mut scheduler = scheduler(&staged_config(), &transport);

    scheduler.tick().await;

    let ui = UiRefs::legacy();
    let surface = scheduler.surface();
    assert_eq!(surface.text(&ui.status_message), Some("Running"));
    assert_controls(surface, &ui, false, false, false);
    assert_console(surface, &ui, &["10:00 starting"]);
}

#[tokio::test]
async fn test_server_message_replaces_default() {
    let transport = MockTransport::new();
    transport.script_status(
        STATUS_URL,
        vec![
            Ok(StatusResponse {
                status: 2,
                status_message: Some("Aligning 3 of 10 files".to_string()),
                ..Default::default()
            }),
            Ok(StatusResponse {
                status: -1,
                status_message: Some("Running".to_string()),
                error_message: Some("CLAM server unreachable".to_string()),
                errors: true,
                log: None,
            }),
        ],
    );
    let mut scheduler = scheduler(&page_config(), &transport);
    let ui = UiRefs::legacy();

    scheduler.tick().await;
    assert_eq!(
        scheduler.surface().text(&ui.status_message),
        Some("Aligning 3 of 10 files")
    );

    scheduler.tick().await;
    assert_eq!(
        scheduler.surface().text(&ui.status_message),
        Some("CLAM server unreachable")
    );
    assert_controls(scheduler.surface(), &ui, false, false, false);
}

#[tokio::test]
async fn test_transport_failure_keeps_last_known_state() {
    let transport = MockTransport::new();
    transport.script_status(
        STATUS_URL,
        vec![
            Ok(status_with_log(2, &[("10:00", "starting")])),
            Err(TransportError::Timeout {
                url: STATUS_URL.to_string(),
            }),
            Ok(status_with_log(5, &[("10:00", "starting"), ("10:05", "done")])),
        ],
    );
    let mut scheduler = scheduler(&page_config(), &transport);
    let ui = UiRefs::legacy();

    scheduler.tick().await;
    let writes = scheduler.surface().write_count();

    let tick = scheduler.tick().await;
    assert_eq!(tick, 2);
    assert_eq!(scheduler.surface().write_count(), writes);
    assert_eq!(scheduler.surface().text(&ui.status_message), Some("Running"));
    assert_eq!(scheduler.surface().last_tick(), Some(2));
    let state = scheduler.descriptor_state("process").expect("state missing");
    assert_eq!(state.failures, 1);
    assert_eq!(state.phase, PollPhase::Idle);

    // The next tick still polls and recovers
    scheduler.tick().await;
    assert_eq!(scheduler.surface().text(&ui.status_message), Some("Done"));
    assert_controls(scheduler.surface(), &ui, false, true, false);
    assert_console(scheduler.surface(), &ui, &["10:00 starting", "10:05 done"]);
    assert_eq!(
        scheduler.descriptor_state("process").map(|s| s.failures),
        Some(0)
    );
}

#[tokio::test]
async fn test_done_does_not_refetch_loaded_log() {
    let transport = MockTransport::new();
    let log_url = format!("{LOG_BASE_URL}output.log");
    transport.set_log(&log_url, "step 1\nstep 2\n");
    transport.script_status(STATUS_URL, vec![Ok(status(2)), Ok(status(5))]);
    let mut scheduler = scheduler(&file_mode_config("output.log"), &transport);
    let ui = UiRefs::legacy();

    scheduler.tick().await;
    assert_console(scheduler.surface(), &ui, &["step 1", "step 2", ""]);
    assert_eq!(transport.log_requests(&log_url), 1);

    scheduler.tick().await;
    scheduler.tick().await;

    assert_eq!(scheduler.surface().text(&ui.status_message), Some("Done"));
    assert_controls(scheduler.surface(), &ui, false, true, false);
    assert_eq!(transport.log_requests(&log_url), 1);
}

#[tokio::test]
async fn test_done_in_staged_dialect() {
    let transport = MockTransport::new();
    transport.respond(STATUS_URL, status(3));
    let mut scheduler = scheduler(&staged_config(), &transport);

    scheduler.tick().await;

    let ui = UiRefs::legacy();
    assert_eq!(scheduler.surface().text(&ui.status_message), Some("Done"));
    assert_controls(scheduler.surface(), &ui, false, true, false);
}

#[tokio::test]
async fn test_rerun_after_done_keeps_start_visible() {
    let transport = MockTransport::new();
    transport.respond(STATUS_URL, status(5));
    let config = PageConfig {
        rerun_after_done: true,
        ..page_config()
    };
    let mut scheduler = scheduler(&config, &transport);

    scheduler.tick().await;

    assert_controls(scheduler.surface(), &UiRefs::legacy(), true, true, false);
}

#[tokio::test]
async fn test_unknown_code_loads_log_once() {
    let transport = MockTransport::new();
    let log_url = format!("{LOG_BASE_URL}output.log");
    transport.set_log(&log_url, "traceback");
    transport.respond(STATUS_URL, status(99));
    let mut scheduler = scheduler(&file_mode_config("output.log"), &transport);
    let ui = UiRefs::legacy();

    scheduler.tick().await;
    scheduler.tick().await;
    scheduler.tick().await;

    assert_eq!(
        scheduler.surface().text(&ui.status_message),
        Some("Server returned an unknown status code")
    );
    assert_controls(scheduler.surface(), &ui, false, false, false);
    assert_console(scheduler.surface(), &ui, &["traceback"]);
    assert_eq!(transport.log_requests(&log_url), 1);
}

#[tokio::test]
async fn test_log_loads_while_status_endpoint_fails() {
    let transport = MockTransport::new();
    let log_url = format!("{LOG_BASE_URL}output.log");
    transport.set_log(&log_url, "worker crashed");
    transport.script_status(
        STATUS_URL,
        vec![Err(TransportError::Status {
            url: STATUS_URL.to_string(),
            status: 502,
            body: "Bad Gateway".to_string(),
        })],
    );
    let mut scheduler = scheduler(&file_mode_config("output.log"), &transport);
    let ui = UiRefs::legacy();

    scheduler.tick().await;
    scheduler.tick().await;

    assert_eq!(scheduler.surface().text(&ui.status_message), None);
    assert_console(scheduler.surface(), &ui, &["worker crashed"]);
    assert_eq!(transport.log_requests(&log_url), 1);
}

#[tokio::test]
async fn test_unavailable_log_is_retried_next_tick() {
    let transport = MockTransport::new();
    transport.respond(STATUS_URL, status(2));
    let mut scheduler = scheduler(&file_mode_config("None"), &transport);

    scheduler.tick().await;
    scheduler.tick().await;

    let ui = UiRefs::legacy();
    assert!(scheduler.surface().element(&ui.console_output).is_none());
    assert_eq!(transport.status_requests(STATUS_URL), 2);
    assert_eq!(transport.requests().len(), 2);
}

#[tokio::test]
async fn test_multi_process_updates_own_elements() {
    let transport = MockTransport::new();
    transport.respond(&process_url("fa"), status(2));
    transport.respond(&process_url("g2p"), status(5));
    transport.set_delay(&process_url("fa"), Duration::from_millis(30));
    let mut scheduler = scheduler(&multi_process_config(&["fa", "g2p"]), &transport);

    scheduler.tick().await;

    let fa = UiRefs::for_process("fa");
    let g2p = UiRefs::for_process("g2p");
    let surface = scheduler.surface();
    assert_eq!(surface.text(&fa.status_message), Some("Running"));
    assert_eq!(surface.text(&g2p.status_message), Some("Done"));
    assert_controls(surface, &fa, false, false, false);
    assert_controls(surface, &g2p, false, true, false);
    assert!(surface.element(&UiRefs::legacy().status_message).is_none());
}

#[tokio::test]
async fn test_one_failing_process_does_not_block_others() {
    let transport = MockTransport::new();
    transport.script_status(
        &process_url("fa"),
        vec![Err(TransportError::Request {
            url: process_url("fa"),
            reason: "connection refused".to_string(),
        })],
    );
    transport.respond(&process_url("g2p"), status(2));
    let mut scheduler = scheduler(&multi_process_config(&["fa", "g2p"]), &transport);

    scheduler.tick().await;
    scheduler.tick().await;

    let surface = scheduler.surface();
    assert!(surface.text(&UiRefs::for_process("fa").status_message).is_none());
    assert_eq!(
        surface.text(&UiRefs::for_process("g2p").status_message),
        Some("Running")
    );
    assert_eq!(
        scheduler.descriptor_state("fa").map(|s| s.failures),
        Some(2)
    );
}

#[test]
fn test_missing_configuration_never_starts() {
    let no_token = PageConfig {
        csrf_token: Some("   ".to_string()),
        ..page_config()
    };
    let no_endpoint = PageConfig {
        status_url: None,
        ..page_config()
    };

    for config in [no_token, no_endpoint] {
        let scheduler =
            PollScheduler::try_start(&config, MockTransport::new(), MemorySurface::new());
        assert!(scheduler.is_none());
    }
}

#[tokio::test(start_paused = true)]
async fn test_ticks_never_overlap_under_latency() {
    let transport = MockTransport::new();
    transport.respond(STATUS_URL, status(2));
    transport.set_delay(STATUS_URL, Duration::from_secs(3));
    let config = PageConfig {
        poll_interval_ms: 1_000,
        ..page_config()
    };
    let mut scheduler = scheduler(&config, &transport);
    let (stop_tx, stop_rx) = oneshot::channel::<()>();

    let handle = tokio::spawn(async move {
        scheduler
            .run(None, async {
                let _ = stop_rx.await;
            })
            .await;
        scheduler
    });

    tokio::time::sleep(Duration::from_secs(30)).await;
    let _ = stop_tx.send(());
    let scheduler = handle.await.expect("scheduler task panicked");

    let requests = transport.status_requests(STATUS_URL);
    assert_eq!(transport.max_in_flight(STATUS_URL), 1);
    // Each cycle takes 3s of latency plus 1s of idle time
    assert!(requests >= 7 && requests <= 8, "requests = {requests}");
    assert!(scheduler.ticks() >= 7);
}

#[tokio::test(start_paused = true)]
async fn test_poll_now_wakes_idle_scheduler() {
    let transport = MockTransport::new();
    transport.respond(STATUS_URL, status(2));
    let config = PageConfig {
        poll_interval_ms: 60_000,
        ..page_config()
    };
    let mut scheduler = scheduler(&config, &transport);
    let mut ticks = scheduler.subscribe_ticks();
    let (ops_tx, ops_rx) = mpsc::unbounded_channel();

    let handle = tokio::spawn(async move {
        scheduler.run(Some(ops_rx), std::future::pending::<()>()).await;
        scheduler
    });

    ticks.wait_for(|t| *t >= 1).await.expect("scheduler gone");
    let started = tokio::time::Instant::now();

    ops_tx.send(Op::PollNow).expect("scheduler gone");
    ticks.wait_for(|t| *t >= 2).await.expect("scheduler gone");
    assert!(started.elapsed() < Duration::from_secs(60));

    ops_tx.send(Op::Shutdown).expect("scheduler gone");
    let scheduler = handle.await.expect("scheduler task panicked");
    assert_eq!(scheduler.ticks(), 2);
    assert_eq!(transport.status_requests(STATUS_URL), 2);
}

#[tokio::test(start_paused = true)]
async fn test_closed_op_channel_stops_scheduler() {
    let transport = MockTransport::new();
    transport.respond(STATUS_URL, status(0));
    let mut scheduler = scheduler(&page_config(), &transport);
    let mut ticks = scheduler.subscribe_ticks();
    let (ops_tx, ops_rx) = mpsc::unbounded_channel::<Op>();

    let handle = tokio::spawn(async move {
        scheduler.run(Some(ops_rx), std::future::pending::<()>()).await;
        scheduler
    });

    ticks.wait_for(|t| *t >= 1).await.expect("scheduler gone");
    drop(ops_tx);
    let scheduler = handle.await.expect("scheduler task panicked");
    assert_eq!(scheduler.ticks(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_abandons_running_tick() {
    let transport = MockTransport::new();
    transport.respond(STATUS_URL, status(2));
    transport.set_delay(STATUS_URL, Duration::from_secs(30));
    let mut scheduler = scheduler(&page_config(), &transport);
    let (ops_tx, ops_rx) = mpsc::unbounded_channel();
    let started = tokio::time::Instant::now();

    let handle = tokio::spawn(async move {
        scheduler.run(Some(ops_rx), std::future::pending::<()>()).await;
        scheduler
    });

    tokio::time::sleep(Duration::from_secs(1)).await;
    ops_tx.send(Op::Shutdown).expect("scheduler gone");
    let scheduler = handle.await.expect("scheduler task panicked");

    assert!(
        started.elapsed() < Duration::from_secs(2),
        "shutdown took {:?}",
        started.elapsed()
    );
    assert_eq!(scheduler.ticks(), 0);
    assert_eq!(transport.status_requests(STATUS_URL), 1);
}

#[tokio::test(start_paused = true)]
async fn test_poll_now_during_tick_is_absorbed() {
    let transport = MockTransport::new();
    transport.respond(STATUS_URL, status(2));
    transport.set_delay(STATUS_URL, Duration::from_secs(3));
    let config = PageConfig {
        poll_interval_ms: 60_000,
        ..page_config()
    };
    let mut scheduler = scheduler(&config, &transport);
    let mut ticks = scheduler.subscribe_ticks();
    let (ops_tx, ops_rx) = mpsc::unbounded_channel();

    let handle = tokio::spawn(async move {
        scheduler.run(Some(ops_rx), std::future::pending::<()>()).await;
        scheduler
    });

    tokio::time::sleep(Duration::from_secs(1)).await;
    ops_tx.send(Op::PollNow).expect("scheduler gone");
    ticks.wait_for(|t| *t >= 1).await.expect("scheduler gone");
    tokio::time::sleep(Duration::from_secs(10)).await;

    ops_tx.send(Op::Shutdown).expect("scheduler gone");
    let scheduler = handle.await.expect("scheduler task panicked");
    assert_eq!(scheduler.ticks(), 1);
    assert_eq!(transport.status_requests(STATUS_URL), 1);
}

#[tokio::test(start_paused = true)]
async fn test_slowest_process_sets_the_pace() {
    let transport = MockTransport::new();
    let mut config = multi_process_config(&["fa", "g2p"]);
    config.poll_interval_ms = 1_000;
    config.processes[1].poll_interval_ms = Some(10_000);
    transport.respond(&process_url("fa"), status(2));
    transport.respond(&process_url("g2p"), status(2));
    let mut scheduler = scheduler(&config, &transport);
    assert_eq!(scheduler.interval(), Duration::from_secs(10));

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let handle = tokio::spawn(async move {
        scheduler
            .run(None, async {
                let _ = stop_rx.await;
            })
            .await;
    });

    tokio::time::sleep(Duration::from_secs(25)).await;
    let _ = stop_tx.send(());
    handle.await.expect("scheduler task panicked");

    // Ticks at 0s, 10s and 20s
    assert_eq!(transport.status_requests(&process_url("fa")), 3);
    assert_eq!(transport.status_requests(&process_url("g2p")), 3);
}

#[tokio::test]
async fn test_state_is_idle_between_ticks() {
    let transport = MockTransport::new();
    transport.respond(STATUS_URL, status(2));
    let mut scheduler: PollScheduler<MockTransport, MemorySurface> =
        scheduler(&page_config(), &transport);

    assert_eq!(scheduler.state_of("process"), Some(PollPhase::Idle));
    scheduler.tick().await;
    assert_eq!(scheduler.state_of("process"), Some(PollPhase::Idle));

    let state = scheduler.descriptor_state("process").expect("state missing");
    assert_eq!(state.issued, 1);
    assert_eq!(state.applied, 1);
}
