use std::cell::RefCell;
use std::rc::Rc;

use serde_json::json;

use tabswitch::message_handler::MessageRouter;
use tabswitch::types::message::{
    self, Message, MessageKind, Response, ResponseKind, SenderInfo,
};
use tabswitch::types::settings::SwitcherSettings;

fn counting_router() -> (MessageRouter, Rc<RefCell<Vec<MessageKind>>>) {
    let calls: Rc<RefCell<Vec<MessageKind>>> = Rc::new(RefCell::new(Vec::new()));
    let mut router = MessageRouter::new();

    let sink = calls.clone();
    router.register(
        MessageKind::SelectTab,
        Box::new(move |message, _sender| {
            sink.borrow_mut().push(message.kind());
            Some(Response::SelectionState {
                page_has_focus: true,
            })
        }),
    );

    let sink = calls.clone();
    router.register(
        MessageKind::CloseOverlay,
        Box::new(move |message, _sender| {
            sink.borrow_mut().push(message.kind());
            None
        }),
    );

    (router, calls)
}

#[test]
fn test_well_formed_message_invokes_exactly_one_handler_once() {
    let (mut router, calls) = counting_router();
    let sender = SenderInfo::default();

    let raw = serde_json::to_value(message::select_tab(1, 1.0)).unwrap();
    let response = router.dispatch(&raw, &sender);

    assert_eq!(
        response,
        Some(Response::SelectionState {
            page_has_focus: true
        })
    );
    assert_eq!(*calls.borrow(), vec![MessageKind::SelectTab]);
}

#[test]
fn test_unknown_type_no_response_no_panic() {
    let (mut router, calls) = counting_router();
    let sender = SenderInfo::default();

    let response = router.dispatch(&json!({"type": "defragment"}), &sender);
    assert!(response.is_none());
    assert!(calls.borrow().is_empty());
}

#[test]
fn test_untagged_object_rejected() {
    let (mut router, calls) = counting_router();
    let sender = SenderInfo::default();

    assert!(router.dispatch(&json!({"offset": 1}), &sender).is_none());
    assert!(router.dispatch(&json!(42), &sender).is_none());
    assert!(router.dispatch(&json!(null), &sender).is_none());
    assert!(calls.borrow().is_empty());
}

#[test]
fn test_recognized_type_without_handler_is_dropped() {
    let (mut router, calls) = counting_router();
    let sender = SenderInfo::default();

    // get_settings is a valid message type but nothing registered it here
    let response = router.dispatch(&json!({"type": "get_settings"}), &sender);
    assert!(response.is_none());
    assert!(calls.borrow().is_empty());
}

#[test]
fn test_fire_and_forget_produces_no_response() {
    let (mut router, calls) = counting_router();
    let sender = SenderInfo::default();

    let raw = serde_json::to_value(message::close_overlay()).unwrap();
    assert!(router.dispatch(&raw, &sender).is_none());
    assert_eq!(*calls.borrow(), vec![MessageKind::CloseOverlay]);
}

#[test]
fn test_constructor_roundtrip_reaches_select_tab_handler() {
    let (mut router, calls) = counting_router();
    let sender = SenderInfo::default();

    // A message built by a constructor survives the wire format and the
    // type guard, and lands on the handler registered for its kind.
    let wire = serde_json::to_string(&message::select_tab(-1, 1.5)).unwrap();
    let raw: serde_json::Value = serde_json::from_str(&wire).unwrap();
    let response = router.dispatch(&raw, &sender);

    assert!(matches!(response, Some(Response::SelectionState { .. })));
    assert_eq!(calls.borrow().len(), 1);
}

#[test]
fn test_handler_receives_sender_info() {
    let seen: Rc<RefCell<Option<SenderInfo>>> = Rc::new(RefCell::new(None));
    let sink = seen.clone();

    let mut router = MessageRouter::new();
    router.register(
        MessageKind::ContentStarted,
        Box::new(move |_message, sender| {
            *sink.borrow_mut() = Some(sender.clone());
            None
        }),
    );

    let sender = SenderInfo {
        tab_id: Some(7),
        url: Some("https://example.test/".to_string()),
        frame_id: Some(0),
    };
    router.dispatch(&json!({"type": "content_started"}), &sender);

    assert_eq!(seen.borrow().as_ref().unwrap().tab_id, Some(7));
}

#[test]
fn test_register_replaces_previous_handler() {
    let mut router = MessageRouter::new();
    assert!(!router.has_handler(MessageKind::GetSettings));
    router.register(
        MessageKind::GetSettings,
        Box::new(|_m, _s| {
            Some(Response::Settings {
                settings: SwitcherSettings::default(),
            })
        }),
    );
    let mut replaced = SwitcherSettings::default();
    replaced.behavior.number_of_tabs_to_show = 11;
    let replacement = replaced.clone();
    router.register(
        MessageKind::GetSettings,
        Box::new(move |_m, _s| {
            Some(Response::Settings {
                settings: replacement.clone(),
            })
        }),
    );

    let response = router
        .dispatch(&json!({"type": "get_settings"}), &SenderInfo::default())
        .unwrap();
    match response {
        Response::Settings { settings } => {
            assert_eq!(settings.behavior.number_of_tabs_to_show, 11)
        }
        other => panic!("unexpected response: {:?}", other),
    }
}

#[test]
fn test_every_message_kind_has_a_stable_response_mapping() {
    // The closed vocabulary: every kind resolves its wire name and its
    // response shape without panicking, and the two sides agree.
    let some_tab = tabswitch::types::tab::Tab {
        id: 1,
        window_id: 1,
        title: "t".to_string(),
        url: "https://t.test/".to_string(),
        favicon_url: None,
        active: true,
    };
    let kinds = [
        (Message::SelectTab { offset: 1, zoom_factor: 1.0 }, Some(ResponseKind::SelectionState)),
        (Message::GetModel, Some(ResponseKind::Model)),
        (Message::GetSettings, Some(ResponseKind::Settings)),
        (Message::GetLogs, Some(ResponseKind::Logs)),
        (Message::GetRenderingTime, Some(ResponseKind::RenderingTime)),
        (Message::IsMessagingReady, Some(ResponseKind::MessagingReady)),
        (Message::IsPageActive, Some(ResponseKind::PageActive)),
        (Message::ApplySettings { settings: SwitcherSettings::default() }, None),
        (Message::DemoSettings { settings: SwitcherSettings::default() }, None),
        (Message::SetSettings { settings: SwitcherSettings::default() }, None),
        (Message::SwitchTo { tab: some_tab }, None),
        (Message::CloseOverlay, None),
        (Message::OverlayClosed, None),
        (Message::ContentStarted, None),
        (Message::ContentStopped, None),
        (Message::ForceZoom { factor: 1.0 }, None),
    ];
    for (message, expected) in kinds {
        assert_eq!(message.kind().response_kind(), expected, "{:?}", message);
        assert_eq!(
            MessageKind::from_wire(message.kind().as_str()),
            Some(message.kind())
        );
    }
}
