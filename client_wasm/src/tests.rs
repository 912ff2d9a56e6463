use crate::fsm::{ConnectError, ConnectionState};
use crate::identity::{IdentityProvider, MemoryIdentity};
use crate::network::{Connection, EventSink, Transport, TransportError};
use crate::render_loop::RenderLoop;
use crate::session::{FrameHost, Session};
use crate::state::SnapshotCell;
use crate::status::{DisplayIntent, StatusCode};
use game_core::{NoEffects, SurfaceSize};
use glam::Vec2;
use proto::{Bounds, GameSpecs, GameState, ProtocolError, Winner, C2S};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

type Log = Rc<RefCell<Vec<String>>>;

struct MockTransport {
    sent: Rc<RefCell<Vec<Vec<u8>>>>,
    log: Log,
}

impl Transport for MockTransport {
    fn send_bytes(&self, bytes: &[u8]) -> Result<(), TransportError> {
        self.sent.borrow_mut().push(bytes.to_vec());
        Ok(())
    }

    fn close(&self) {
        self.log.borrow_mut().push("close".to_string());
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Recorded {
    Connect,
    ConnectError(ConnectError),
    Disconnect,
    State(GameState),
    Status(DisplayIntent),
    GameId(String),
}

struct RecordingSink {
    events: Rc<RefCell<Vec<Recorded>>>,
}

impl EventSink for RecordingSink {
    fn on_connect(&mut self) {
        self.events.borrow_mut().push(Recorded::Connect);
    }
    fn on_connect_error(&mut self, error: &ConnectError) {
        self.events
            .borrow_mut()
            .push(Recorded::ConnectError(error.clone()));
    }
    fn on_disconnect(&mut self) {
        self.events.borrow_mut().push(Recorded::Disconnect);
    }
    fn on_state(&mut self, state: &GameState) {
        self.events.borrow_mut().push(Recorded::State(*state));
    }
    fn on_status(&mut self, intent: &DisplayIntent) {
        self.events.borrow_mut().push(Recorded::Status(intent.clone()));
    }
    fn on_game_id(&mut self, id: &str) {
        self.events.borrow_mut().push(Recorded::GameId(id.to_string()));
    }
}

/// Memory identity that counts cleanups
struct CountingIdentity {
    inner: MemoryIdentity,
    clears: Rc<Cell<usize>>,
    current: Rc<RefCell<Option<String>>>,
}

impl IdentityProvider for CountingIdentity {
    fn player_name(&self) -> Option<String> {
        self.inner.player_name()
    }
    fn set_player_name(&mut self, name: &str) {
        self.inner.set_player_name(name);
    }
    fn current_game(&self) -> Option<String> {
        self.current.borrow().clone()
    }
    fn set_current_game(&mut self, id: &str) {
        *self.current.borrow_mut() = Some(id.to_string());
    }
    fn clear_current_game(&mut self) {
        self.clears.set(self.clears.get() + 1);
        *self.current.borrow_mut() = None;
    }
}

struct RecordingHost {
    log: Log,
}

impl FrameHost for RecordingHost {
    fn cancel_frames(&mut self) {
        self.log.borrow_mut().push("cancel_frames".to_string());
    }
    fn release_listeners(&mut self) {
        self.log.borrow_mut().push("release_listeners".to_string());
    }
}

struct Harness {
    connection: Connection<MockTransport>,
    sent: Rc<RefCell<Vec<Vec<u8>>>>,
    events: Rc<RefCell<Vec<Recorded>>>,
    clears: Rc<Cell<usize>>,
    current: Rc<RefCell<Option<String>>>,
    log: Log,
}

impl Harness {
    fn new(room: Option<&str>) -> Self {
        let sent = Rc::new(RefCell::new(Vec::new()));
        let events = Rc::new(RefCell::new(Vec::new()));
        let clears = Rc::new(Cell::new(0));
        let current = Rc::new(RefCell::new(room.map(str::to_string)));
        let log: Log = Rc::new(RefCell::new(Vec::new()));

        let connection = Connection::new(
            MockTransport {
                sent: sent.clone(),
                log: log.clone(),
            },
            SnapshotCell::new(),
            Box::new(RecordingSink {
                events: events.clone(),
            }),
            Box::new(CountingIdentity {
                inner: MemoryIdentity::with_player_name("ada"),
                clears: clears.clone(),
                current: current.clone(),
            }),
            room.map(str::to_string),
        );
        Self {
            connection,
            sent,
            events,
            clears,
            current,
            log,
        }
    }

    fn connected(room: Option<&str>) -> Self {
        let mut h = Self::new(room);
        h.connection.handle_open();
        h.events.borrow_mut().clear();
        h
    }

    fn events(&self) -> Vec<Recorded> {
        self.events.borrow().clone()
    }
}

fn status_frame(text: &str) -> Vec<u8> {
    let mut bytes = vec![0x02, text.len() as u8];
    bytes.extend_from_slice(text.as_bytes());
    bytes
}

fn sample_state(left: u8) -> GameState {
    let mut state = GameState::default();
    state.ball.x = 0.25;
    state.ball.y = 0.75;
    state.paddles.left = 0.4;
    state.paddles.right = 0.6;
    state.score.left = left;
    state
}

// ---------------------------------------------------------------------------
// Connection
// ---------------------------------------------------------------------------

#[test]
fn test_open_emits_connect() {
    let mut h = Harness::new(None);
    assert_eq!(h.connection.state(), &ConnectionState::Connecting);
    h.connection.handle_open();
    assert_eq!(h.connection.state(), &ConnectionState::Connected);
    assert_eq!(h.events(), vec![Recorded::Connect]);
}

#[test]
fn test_send_ignored_unless_connected() {
    let mut h = Harness::new(None);
    h.connection.send(C2S::PaddleUp);
    assert!(h.sent.borrow().is_empty());

    h.connection.handle_open();
    h.connection.send(C2S::PaddleUp);
    h.connection.send(C2S::PaddleDown);
    assert_eq!(*h.sent.borrow(), vec![vec![0x01], vec![0x02]]);

    h.connection.close();
    h.connection.send(C2S::PaddleUp);
    assert_eq!(h.sent.borrow().len(), 2);
}

#[test]
fn test_state_frame_updates_snapshot() {
    let mut h = Harness::connected(None);
    let state = sample_state(3);
    h.connection.handle_message(&state.to_frame()).unwrap();

    assert_eq!(h.connection.snapshot().latest(), Some(state));
    assert_eq!(h.events(), vec![Recorded::State(state)]);
}

#[test]
fn test_malformed_frame_keeps_previous_snapshot() {
    let mut h = Harness::connected(None);
    let state = sample_state(1);
    h.connection.handle_message(&state.to_frame()).unwrap();

    let short = &state.to_frame()[..12];
    let err = h.connection.handle_message(short).unwrap_err();
    assert_eq!(
        err,
        ProtocolError::StateLength {
            expected: 20,
            actual: 12
        }
    );

    let truncated = [0x02, 10, b'g', b'a'];
    assert!(h.connection.handle_message(&truncated).is_err());
    assert!(h.connection.handle_message(&[]).is_err());

    assert_eq!(h.connection.snapshot().latest(), Some(state));
    assert_eq!(h.connection.state(), &ConnectionState::Connected);
    assert_eq!(h.connection.dropped_frames(), 3);
    assert!(h.log.borrow().is_empty(), "Bad frames never close the socket");
}

#[test]
fn test_unknown_tag_ignored() {
    let mut h = Harness::connected(None);
    assert!(h.connection.handle_message(&[0x09, 1, 2, 3]).is_ok());
    assert!(h.events().is_empty());
    assert_eq!(h.connection.dropped_frames(), 0);
}

#[test]
fn test_winner_byte_out_of_range() {
    let mut h = Harness::connected(None);
    let mut frame = sample_state(0).to_frame();
    frame[19] = 7;
    h.connection.handle_message(&frame).unwrap();
    assert_eq!(
        h.connection.snapshot().latest().map(|s| s.winner),
        Some(Winner::None)
    );
}

#[test]
fn test_status_routed_through_mapper() {
    let mut h = Harness::connected(None);
    h.connection
        .handle_message(&status_frame("game_starting"))
        .unwrap();
    match &h.events()[..] {
        [Recorded::Status(intent)] => {
            assert_eq!(intent.code, Some(StatusCode::GameStarting));
            assert_eq!(intent.text, "Game starting in 3...");
        }
        other => panic!("Unexpected events {:?}", other),
    }
    assert_eq!(h.clears.get(), 0);
}

#[test]
fn test_repeated_game_over_is_idempotent() {
    let mut h = Harness::connected(Some("room-1"));
    for _ in 0..3 {
        h.connection
            .handle_message(&status_frame("game_over_left"))
            .unwrap();
    }
    assert_eq!(h.clears.get(), 3, "Cleanup runs once per message");
    assert_eq!(*h.current.borrow(), None);

    let events = h.events();
    assert_eq!(events.len(), 3);
    for event in events {
        match event {
            Recorded::Status(intent) => {
                assert!(intent.game_over);
                assert_eq!(intent.winner, Winner::Left);
                assert_eq!(intent.text, "Game Over - Left player wins!");
            }
            other => panic!("Unexpected event {:?}", other),
        }
    }
}

#[test]
fn test_assigned_id_for_new_game() {
    let mut h = Harness::connected(None);
    h.connection.handle_message(&[0x03, 4, b'a', b'b', b'c', b'd']).unwrap();
    assert_eq!(h.events(), vec![Recorded::GameId("abcd".to_string())]);
    assert_eq!(h.current.borrow().as_deref(), Some("abcd"));
    assert_eq!(h.connection.identity().current_game().as_deref(), Some("abcd"));
}

#[test]
fn test_assigned_id_ignored_when_room_requested() {
    let mut h = Harness::connected(Some("mine"));
    h.connection.handle_message(&[0x03, 2, b'z', b'z']).unwrap();
    assert!(h.events().is_empty());
    assert_eq!(h.current.borrow().as_deref(), Some("mine"));
}

#[test]
fn test_room_full_is_connect_error() {
    let mut h = Harness::connected(Some("abc"));
    h.connection.handle_close(1000, "Room is full");
    assert_eq!(
        h.connection.state(),
        &ConnectionState::Errored(ConnectError::RoomFull)
    );
    assert_eq!(
        h.events(),
        vec![Recorded::ConnectError(ConnectError::RoomFull)]
    );
    assert_eq!(ConnectError::RoomFull.to_string(), "room full");
}

#[test]
fn test_room_not_found_before_open() {
    let mut h = Harness::new(Some("gone"));
    h.connection.handle_close(1000, "Game room not found");
    assert_eq!(
        h.events(),
        vec![Recorded::ConnectError(ConnectError::RoomNotFound)]
    );
}

#[test]
fn test_failure_before_open_is_generic() {
    let mut h = Harness::new(None);
    h.connection.handle_error();
    h.connection.handle_close(1006, "");
    assert_eq!(
        h.events(),
        vec![Recorded::ConnectError(ConnectError::Generic)]
    );
    assert_eq!(ConnectError::Generic.to_string(), "generic failure");
}

#[test]
fn test_close_after_failure_releases_transport() {
    let mut h = Harness::new(None);
    h.connection.handle_error();
    h.connection.close();
    assert_eq!(*h.log.borrow(), vec!["close".to_string()]);
    assert_eq!(
        h.connection.state(),
        &ConnectionState::Errored(ConnectError::Generic)
    );

    h.connection.close();
    assert_eq!(h.log.borrow().len(), 1);
}

#[test]
fn test_close_after_remote_close_releases_transport() {
    let mut h = Harness::connected(None);
    h.connection.handle_close(1006, "");
    h.connection.close();
    assert_eq!(*h.log.borrow(), vec!["close".to_string()]);
    assert_eq!(h.events(), vec![Recorded::Disconnect]);
}

#[test]
fn test_close_after_open_is_disconnect() {
    let mut h = Harness::connected(None);
    h.connection.handle_error();
    h.connection.handle_close(1006, "");
    assert_eq!(h.events(), vec![Recorded::Disconnect]);
    assert_eq!(h.connection.state(), &ConnectionState::Disconnected);

    // Nothing reconnects or moves afterwards
    h.connection.handle_open();
    assert_eq!(h.connection.state(), &ConnectionState::Disconnected);
}

#[test]
fn test_close_twice_is_noop() {
    let mut h = Harness::connected(None);
    h.connection.handle_message(&sample_state(1).to_frame()).unwrap();

    h.connection.close();
    h.connection.close();
    assert_eq!(*h.log.borrow(), vec!["close".to_string()]);
    assert!(h.events().iter().all(|e| matches!(e, Recorded::State(_))));

    h.connection.handle_message(&sample_state(9).to_frame()).unwrap();
    assert_eq!(
        h.connection.snapshot().latest().map(|s| s.score.left),
        Some(1),
        "No decode after close"
    );
    h.connection.handle_close(1000, "");
    assert_eq!(h.events().len(), 1, "Late close after local close is silent");
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

fn session(specs: GameSpecs, container: SurfaceSize) -> (Session<MockTransport>, Harness) {
    let mut h = Harness::new(None);
    let connection = std::mem::replace(&mut h.connection, Harness::new(None).connection);
    let render = RenderLoop::new(specs, Box::new(NoEffects), container);
    (Session::new(connection, render), h)
}

#[test]
fn test_session_sends_one_command_per_tick() {
    let (mut s, h) = session(GameSpecs::default(), SurfaceSize::new(400.0, 400.0));
    assert!(s.key_down("ArrowUp"));
    s.tick();
    assert!(h.sent.borrow().is_empty(), "Not connected yet");

    s.connection_mut().handle_open();
    s.key_down("ArrowDown");
    s.tick();
    s.tick();
    assert_eq!(*h.sent.borrow(), vec![vec![0x01], vec![0x01]]);

    s.key_up("ArrowUp");
    s.tick();
    assert_eq!(h.sent.borrow().last(), Some(&vec![0x02]));

    s.blur();
    s.tick();
    assert_eq!(h.sent.borrow().len(), 3);
}

#[test]
fn test_session_keeps_moving_while_second_key_held() {
    let (mut s, h) = session(GameSpecs::default(), SurfaceSize::new(400.0, 400.0));
    s.connection_mut().handle_open();
    s.key_down("ArrowUp");
    s.key_down("w");
    s.key_up("w");
    s.tick();
    assert_eq!(*h.sent.borrow(), vec![vec![0x01]], "ArrowUp still held");
}

#[test]
fn test_initial_positions_before_first_snapshot() {
    let mut specs = GameSpecs::default();
    specs.ball.initial.x = 0.3;
    specs.ball.initial.y = 0.7;
    specs.paddle.initial.y = 0.25;
    let (mut s, _h) = session(specs.clone(), SurfaceSize::new(500.0, 500.0));

    let frame = s.tick().unwrap();
    let ball = frame.scene.circles[0];
    assert!(ball.center().abs_diff_eq(Vec2::new(150.0, 350.0), 1e-3));

    let paddles: Vec<_> = frame
        .scene
        .rects
        .iter()
        .filter(|r| r.tint[3] == 1.0)
        .collect();
    assert_eq!(paddles.len(), 2);
    assert!((paddles[0].center().y - 125.0).abs() < 1e-3);
    assert!((paddles[1].center().y - 125.0).abs() < 1e-3);
}

#[test]
fn test_snapshot_drives_render() {
    let (mut s, _h) = session(GameSpecs::default(), SurfaceSize::new(400.0, 400.0));
    s.connection_mut().handle_open();
    s.connection_mut()
        .handle_message(&sample_state(2).to_frame())
        .unwrap();

    let frame = s.tick().unwrap();
    assert!(frame.scene.circles[0]
        .center()
        .abs_diff_eq(Vec2::new(100.0, 300.0), 1e-3));
}

#[test]
fn test_resize_height_constrained() {
    let mut specs = GameSpecs::default();
    specs.game.bounds = Bounds {
        width: 4.0,
        height: 3.0,
    };
    let (mut s, _h) = session(specs, SurfaceSize::new(100.0, 100.0));

    let surface = s.resize(SurfaceSize::new(800.0, 300.0));
    assert!((surface.width - 400.0).abs() < 1e-3);
    assert!((surface.height - 300.0).abs() < 1e-3);

    let frame = s.tick().unwrap();
    assert!(frame.resized);
    assert!((frame.surface.width / frame.surface.height - 4.0 / 3.0).abs() < 1e-5);
}

#[test]
fn test_teardown_order_and_idempotence() {
    let (mut s, h) = session(GameSpecs::default(), SurfaceSize::new(400.0, 400.0));
    s.connection_mut().handle_open();
    s.key_down("w");

    let mut host = RecordingHost { log: h.log.clone() };
    s.teardown(&mut host);
    s.teardown(&mut host);

    assert_eq!(
        *h.log.borrow(),
        vec![
            "cancel_frames".to_string(),
            "release_listeners".to_string(),
            "close".to_string()
        ]
    );
    assert!(s.is_torn_down());
    assert!(s.tick().is_none());
    assert!(h.sent.borrow().is_empty(), "No command after teardown");
    assert_eq!(s.connection().state(), &ConnectionState::Disconnected);
    assert!(h.events().iter().all(|e| *e == Recorded::Connect));
}

#[test]
fn test_teardown_releases_everything_in_any_state() {
    // Before open (setup abandoned half-way)
    let (mut s, h) = session(GameSpecs::default(), SurfaceSize::new(400.0, 400.0));
    s.teardown(&mut RecordingHost { log: h.log.clone() });
    assert_eq!(
        *h.log.borrow(),
        vec![
            "cancel_frames".to_string(),
            "release_listeners".to_string(),
            "close".to_string()
        ]
    );
    assert!(h.events().is_empty(), "Abandoned setup is silent");

    // After a failed connect
    let (mut s, h) = session(GameSpecs::default(), SurfaceSize::new(400.0, 400.0));
    s.connection_mut().handle_error();
    s.teardown(&mut RecordingHost { log: h.log.clone() });
    assert_eq!(h.log.borrow().last(), Some(&"close".to_string()));
    assert_eq!(h.events(), vec![Recorded::ConnectError(ConnectError::Generic)]);
}

#[test]
fn test_pointer_spawns_effects_only_while_running() {
    let specs = GameSpecs::default();
    let render = RenderLoop::new(
        specs,
        game_core::effects_for(game_core::Config::new(), 11),
        SurfaceSize::new(400.0, 400.0),
    );
    let h = Harness::new(None);
    let mut s = Session::new(h.connection, render);

    s.pointer_down(Vec2::new(50.0, 50.0));
    assert!(!s.render_loop().effects().is_empty());

    let log: Log = Rc::new(RefCell::new(Vec::new()));
    s.teardown(&mut RecordingHost { log });
    assert!(s.render_loop().effects().is_empty());
    s.pointer_down(Vec2::new(50.0, 50.0));
    assert!(s.render_loop().effects().is_empty());
}
