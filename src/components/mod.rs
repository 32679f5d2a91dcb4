pub mod app;
pub mod game_view;
pub mod intro_overlay;
pub mod map_view;
pub mod outcome_overlay;
pub mod profile_select;
pub mod stats_panel;
