mod auth;
mod courses;
mod dashboard;
mod forums;
mod uploads;
