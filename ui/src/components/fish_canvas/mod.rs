pub mod main;
mod view;
