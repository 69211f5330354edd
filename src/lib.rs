// Library root
// -----------
// This crate exposes a small library surface for the `critter` CLI. The
// binary (`main.rs`) wires these modules together into the interactive
// shell.
//
// Module responsibilities:
// - `api`: HTTP interactions with the Combat Critters user service
//   (register, login, admin, friends) behind the `UserApi` trait.
// - `command`: pure parsing of a typed line into a `Command`.
// - `session`: the logged-in user id, owned by the shell.
// - `ui`: console rendering, command handlers and the input loop.
// - `config`, `error`, `logging`: startup settings, the error taxonomy and
//   file-based tracing.
//
// Parsing and rendering never touch the network directly, so the whole
// shell can be driven in tests with `api::mock::MockApi`.
pub mod api;
pub mod command;
pub mod config;
pub mod error;
pub mod logging;
pub mod session;
pub mod ui;
