mod attendance;
mod auth;
mod events;
mod health_test;
mod users;
