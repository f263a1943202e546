//! JSON-RPC 2.0 communication layer for the host page.
//!
//! The viewer runs inside an iframe; the embedding page talks to it with
//! `postMessage`. Requests carrying an `id` get a response, requests without
//! one act as fire-and-forget commands.
//!
//! ```text
//! Host (parent window)  <──postMessage──>  Bevy (iframe)
//!        │                                        │
//!        ├─ Request (with ID) ──────────────────> │
//!        │ <───────────────── Response (with ID) ─┤
//!        │ <────────── Notification (no ID) ─────┤
//! ```
//!
//! Session and scene requests never touch state directly. They are turned
//! into `SessionCommand` / `SceneCommand` events so the overlay, keyboard and
//! host page all go through the same path; the outcome comes back as a
//! `session_state` or `diagnostic` notification.
//!
//! ## Methods
//! - `begin_session`: start the interactive session
//! - `toggle_mute`: pause or resume every audio channel
//! - `select_scene` `{scene}`: activate a registered scene
//! - `get_session_state`: state, mute flag, active scene, progress, channels
//!
//! ## Notifications
//! - `loading_progress` `{progress}`
//! - `session_state` `{state, muted, active_scene}`
//! - `diagnostic` `{kind, message}`
//!
//! Error codes follow JSON-RPC 2.0: `-32601` unknown method, `-32602` bad
//! params, `-32603` internal error.

/// Message listener, request dispatch and notification publishing.
pub mod web_rpc;
