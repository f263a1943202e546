pub mod assets;
pub mod camera;
pub mod core;
pub mod loading;
pub mod scene;
pub mod session;
pub mod systems;
pub mod ui;
