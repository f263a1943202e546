use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::engine::scene::registry::SceneRegistry;
use crate::engine::scene::spawn::SceneCommand;
use crate::engine::session::controller::{SessionController, SessionState};
use crate::engine::session::systems::SessionCommand;
use crate::errors::ViewerDiagnostic;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;

#[cfg(target_arch = "wasm32")]
use web_sys::{MessageEvent, window};

/// JSON-RPC 2.0 request structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 response structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub result: Option<serde_json::Value>,
    pub error: Option<RpcError>,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 notification structure for one-way communication.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcNotification {
    pub jsonrpc: String,
    pub method: String,
    pub params: serde_json::Value,
}

/// JSON-RPC 2.0 error object.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

/// Resource managing bidirectional RPC communication between the host page and Bevy.
/// Handles both request-response patterns and notification broadcasting.
#[derive(Resource, Default)]
pub struct WebRpcInterface {
    outgoing_notifications: Vec<RpcNotification>,
    outgoing_responses: Vec<RpcResponse>,
}

impl WebRpcInterface {
    /// Send notification to the host page without expecting response.
    pub fn send_notification(&mut self, method: &str, params: serde_json::Value) {
        self.outgoing_notifications.push(RpcNotification {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
        });
    }

    /// Queue response for transmission to the host page.
    fn queue_response(&mut self, response: RpcResponse) {
        self.outgoing_responses.push(response);
    }
}

/// What the host page sees of the session.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub muted: bool,
    pub active_scene: Option<String>,
}

impl SessionSnapshot {
    pub fn capture(controller: &SessionController, registry: &SceneRegistry) -> Self {
        Self {
            state: controller.state(),
            muted: controller.is_muted(),
            active_scene: registry.active_id().map(str::to_string),
        }
    }
}

/// Command produced by an RPC call, applied by the regular session and scene systems.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RpcDispatch {
    Session(SessionCommand),
    Scene(SceneCommand),
}

/// Plugin establishing WebRPC communication layer for iframe-based deployment.
pub struct WebRpcPlugin;

impl Plugin for WebRpcPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WebRpcInterface>()
            .add_event::<IncomingRpcMessage>()
            .add_systems(
                Update,
                (
                    process_incoming_messages,
                    handle_rpc_messages,
                    publish_session_updates,
                    send_outgoing_messages,
                )
                    .chain(),
            );

        #[cfg(target_arch = "wasm32")]
        app.add_systems(Startup, setup_message_listener);
    }
}

#[cfg(target_arch = "wasm32")]
fn setup_message_listener(mut commands: Commands) {
    use std::sync::Arc;
    use std::sync::Mutex;

    // Thread-safe message queue for cross-thread communication.
    let message_queue: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let queue_clone = message_queue.clone();

    let closure = Closure::wrap(Box::new(move |event: MessageEvent| {
        // Filter messages to ensure they contain string data.
        if let Ok(data) = event.data().dyn_into::<js_sys::JsString>() {
            let message_str: String = data.into();

            if message_str.contains("jsonrpc") {
                if let Ok(mut queue) = queue_clone.lock() {
                    queue.push(message_str);
                }
            }
        }
    }) as Box<dyn FnMut(MessageEvent)>);

    match window() {
        Some(window) => {
            if let Err(e) = window
                .add_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
            {
                error!("Failed to register message listener: {:?}", e);
                return;
            }
        }
        None => {
            error!("Window object not available, RPC disabled");
            return;
        }
    }

    // Prevent closure from being dropped by transferring ownership to JS.
    closure.forget();
    commands.insert_resource(MessageQueue(message_queue));
}

/// Resource wrapping thread-safe message queue for WASM event handling.
#[derive(Resource)]
struct MessageQueue(std::sync::Arc<std::sync::Mutex<Vec<String>>>);

/// Event representing incoming RPC message from the host page.
#[derive(Event)]
struct IncomingRpcMessage {
    content: String,
}

fn process_incoming_messages(
    message_queue: Option<Res<MessageQueue>>,
    mut message_events: EventWriter<IncomingRpcMessage>,
) {
    let Some(queue_res) = message_queue else {
        return;
    };

    let messages = if let Ok(mut queue) = queue_res.0.lock() {
        std::mem::take(&mut *queue)
    } else {
        Vec::new()
    };

    for message_str in messages {
        message_events.write(IncomingRpcMessage {
            content: message_str,
        });
    }
}

fn handle_rpc_messages(
    mut events: EventReader<IncomingRpcMessage>,
    controller: Res<SessionController>,
    registry: Res<SceneRegistry>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut session_commands: EventWriter<SessionCommand>,
    mut scene_commands: EventWriter<SceneCommand>,
) {
    for event in events.read() {
        match serde_json::from_str::<RpcRequest>(&event.content) {
            Ok(request) => {
                info!("RPC request: {}", request.method);
                let (response, dispatch) = handle_rpc_request(&request, &controller, &registry);

                match dispatch {
                    Some(RpcDispatch::Session(command)) => {
                        session_commands.write(command);
                    }
                    Some(RpcDispatch::Scene(command)) => {
                        scene_commands.write(command);
                    }
                    None => {}
                }
                if let Some(response) = response {
                    rpc_interface.queue_response(response);
                }
            }
            Err(parse_error) => {
                warn!("Unparseable RPC message: {}", parse_error);
                rpc_interface.send_notification(
                    "diagnostic",
                    serde_json::json!({
                        "kind": "rpc_parse",
                        "message": format!("Parse error: {}", parse_error)
                    }),
                );
            }
        }
    }
}

/// Handle individual RPC request. Requests without an ID are notifications:
/// they still take effect but get no response.
pub fn handle_rpc_request(
    request: &RpcRequest,
    controller: &SessionController,
    registry: &SceneRegistry,
) -> (Option<RpcResponse>, Option<RpcDispatch>) {
    let mut dispatch = None;

    let result = match request.method.as_str() {
        "begin_session" => {
            dispatch = Some(RpcDispatch::Session(SessionCommand::Begin));
            Ok(serde_json::json!({ "accepted": true }))
        }
        "toggle_mute" => {
            dispatch = Some(RpcDispatch::Session(SessionCommand::ToggleMute));
            Ok(serde_json::json!({ "accepted": true }))
        }
        "select_scene" => handle_select_scene(&request.params, registry).map(|command| {
            dispatch = Some(RpcDispatch::Scene(command));
            serde_json::json!({ "accepted": true })
        }),
        "get_session_state" => handle_get_session_state(controller, registry),
        _ => {
            warn!("Unknown RPC method: {}", request.method);
            Err(RpcError {
                code: -32601,
                message: "Method not found".to_string(),
                data: Some(serde_json::json!({"method": request.method})),
            })
        }
    };

    let response = request.id.clone().map(|id| match result {
        Ok(result_value) => RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: Some(result_value),
            error: None,
            id: Some(id),
        },
        Err(error) => create_error_response(id, error),
    });

    (response, dispatch)
}

fn handle_select_scene(
    params: &serde_json::Value,
    registry: &SceneRegistry,
) -> Result<SceneCommand, RpcError> {
    #[derive(serde::Deserialize)]
    struct SelectSceneParams {
        scene: String,
    }

    let scene_params = serde_json::from_value::<SelectSceneParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected 'scene' parameter"))?;

    if !registry.scene_ids().any(|id| id == scene_params.scene) {
        return Err(RpcError::invalid_params(&format!(
            "Unknown scene: {}",
            scene_params.scene
        )));
    }

    Ok(SceneCommand::Select(scene_params.scene))
}

fn handle_get_session_state(
    controller: &SessionController,
    registry: &SceneRegistry,
) -> Result<serde_json::Value, RpcError> {
    let snapshot = SessionSnapshot::capture(controller, registry);
    let mut value = serde_json::to_value(&snapshot)
        .map_err(|e| RpcError::internal_error(&e.to_string()))?;

    if let Some(object) = value.as_object_mut() {
        object.insert(
            "progress".to_string(),
            serde_json::json!(controller.ui().progress),
        );
        object.insert(
            "scenes".to_string(),
            serde_json::json!(registry.scene_ids().collect::<Vec<_>>()),
        );
        object.insert(
            "channels".to_string(),
            serde_json::to_value(controller.channels())
                .map_err(|e| RpcError::internal_error(&e.to_string()))?,
        );
    }
    Ok(value)
}

/// Push progress, session changes and diagnostics to the host page.
fn publish_session_updates(
    controller: Res<SessionController>,
    registry: Res<SceneRegistry>,
    mut diagnostics: EventReader<ViewerDiagnostic>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut last_progress: Local<Option<f32>>,
    mut last_snapshot: Local<Option<SessionSnapshot>>,
) {
    let progress = controller.ui().progress;
    if *last_progress != Some(progress) {
        *last_progress = Some(progress);
        rpc_interface.send_notification("loading_progress", serde_json::json!({ "progress": progress }));
    }

    let snapshot = SessionSnapshot::capture(&controller, &registry);
    if last_snapshot.as_ref() != Some(&snapshot) {
        match serde_json::to_value(&snapshot) {
            Ok(params) => rpc_interface.send_notification("session_state", params),
            Err(e) => error!("Failed to serialize session state: {}", e),
        }
        *last_snapshot = Some(snapshot);
    }

    for diagnostic in diagnostics.read() {
        rpc_interface.send_notification(
            "diagnostic",
            serde_json::json!({
                "kind": diagnostic.kind,
                "message": diagnostic.message
            }),
        );
    }
}

/// Create standardized error response.
fn create_error_response(id: serde_json::Value, error: RpcError) -> RpcResponse {
    RpcResponse {
        jsonrpc: "2.0".to_string(),
        result: None,
        error: Some(error),
        id: Some(id),
    }
}

/// Send queued notifications and responses to the host page.
fn send_outgoing_messages(mut rpc_interface: ResMut<WebRpcInterface>) {
    // Send notifications first.
    for notification in rpc_interface.outgoing_notifications.drain(..) {
        send_message_to_parent(&notification);
    }

    // Send responses second to maintain order.
    for response in rpc_interface.outgoing_responses.drain(..) {
        send_message_to_parent(&response);
    }
}

/// Send serialized message to parent window.
fn send_message_to_parent<T: Serialize>(message: &T) {
    #[cfg(target_arch = "wasm32")]
    {
        match serde_json::to_string(message) {
            Ok(json) => {
                if let Some(window) = window() {
                    if let Some(parent) = window.parent().ok().flatten() {
                        if let Err(e) = parent.post_message(&JsValue::from_str(&json), "*") {
                            error!("Failed to send message to parent: {:?}", e);
                        }
                    } else {
                        warn!("No parent window available for message transmission");
                    }
                } else {
                    error!("Window object not available");
                }
            }
            Err(e) => {
                error!("Failed to serialize message: {}", e);
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        // No-op for non-WASM targets.
        let _ = message;
    }
}

/// Standard RPC error codes and constructors.
impl RpcError {
    pub fn invalid_params(message: &str) -> Self {
        Self {
            code: -32602,
            message: message.to_string(),
            data: None,
        }
    }

    pub fn internal_error(message: &str) -> Self {
        Self {
            code: -32603,
            message: message.to_string(),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::assets::viewer_manifest::ViewerManifest;
    use crate::engine::scene::presets::PresetLibrary;

    fn fixtures() -> (SessionController, SceneRegistry) {
        let manifest = ViewerManifest::default();
        let mut registry = SceneRegistry::new(PresetLibrary::new(
            manifest.light_presets,
            manifest.control_presets,
        ));
        for scene in manifest.scenes {
            registry.register_scene(scene).unwrap();
        }
        registry.activate("main").unwrap();
        (SessionController::new(&manifest.audio_channels), registry)
    }

    fn request(json: &str) -> RpcRequest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_begin_session_dispatches_command() {
        let (controller, registry) = fixtures();
        let (response, dispatch) = handle_rpc_request(
            &request(r#"{"jsonrpc":"2.0","method":"begin_session","id":1}"#),
            &controller,
            &registry,
        );
        assert_eq!(dispatch, Some(RpcDispatch::Session(SessionCommand::Begin)));
        let response = response.unwrap();
        assert_eq!(response.id, Some(serde_json::json!(1)));
        assert!(response.error.is_none());
    }

    #[test]
    fn test_notification_acts_without_response() {
        let (controller, registry) = fixtures();
        let (response, dispatch) = handle_rpc_request(
            &request(r#"{"jsonrpc":"2.0","method":"toggle_mute"}"#),
            &controller,
            &registry,
        );
        assert!(response.is_none());
        assert_eq!(dispatch, Some(RpcDispatch::Session(SessionCommand::ToggleMute)));
    }

    #[test]
    fn test_select_scene_validates_id() {
        let (controller, registry) = fixtures();
        let (_, dispatch) = handle_rpc_request(
            &request(r#"{"jsonrpc":"2.0","method":"select_scene","params":{"scene":"viewer"},"id":2}"#),
            &controller,
            &registry,
        );
        assert_eq!(
            dispatch,
            Some(RpcDispatch::Scene(SceneCommand::Select("viewer".into())))
        );

        let (response, dispatch) = handle_rpc_request(
            &request(r#"{"jsonrpc":"2.0","method":"select_scene","params":{"scene":"lobby"},"id":3}"#),
            &controller,
            &registry,
        );
        assert!(dispatch.is_none());
        assert_eq!(response.unwrap().error.map(|e| e.code), Some(-32602));
    }

    #[test]
    fn test_get_session_state_reports_snapshot() {
        let (controller, registry) = fixtures();
        let (response, _) = handle_rpc_request(
            &request(r#"{"jsonrpc":"2.0","method":"get_session_state","id":"s"}"#),
            &controller,
            &registry,
        );
        let result = response.unwrap().result.unwrap();
        assert_eq!(result["state"], "loading");
        assert_eq!(result["muted"], false);
        assert_eq!(result["active_scene"], "main");
        assert_eq!(result["scenes"], serde_json::json!(["main", "viewer"]));
        assert_eq!(result["channels"][0]["playback"], "idle");
    }

    #[test]
    fn test_unknown_method() {
        let (controller, registry) = fixtures();
        let (response, dispatch) = handle_rpc_request(
            &request(r#"{"jsonrpc":"2.0","method":"get_fps","id":4}"#),
            &controller,
            &registry,
        );
        assert!(dispatch.is_none());
        assert_eq!(response.unwrap().error.map(|e| e.code), Some(-32601));
    }
}
