pub mod header;
pub mod relay_panel;
pub mod rename_form;
pub mod telemetry_panel;
