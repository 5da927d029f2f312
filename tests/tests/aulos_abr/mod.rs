//! Integration tests for aulos-abr driven by a real bandwidth meter

mod meter_to_selection;
mod selection_properties;
