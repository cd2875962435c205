//! Action enum: user intents produced by components.

use farm_proto::protocol::Device;

/// Components produce Actions; the App dispatches them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Ask the controller to set `device` to `desired`.
    Toggle { device: Device, desired: bool },

    OpenRename,
    SubmitRename {
        motor_name: String,
        light_name: String,
    },
    CloseRename,

    /// Drop back to the skeleton and poll right away.
    Reload,
    Quit,
}
