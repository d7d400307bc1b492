pub mod m202601050001_create_users;
pub mod m202601050002_create_roles;
pub mod m202601050003_create_departments_programs;
pub mod m202601050004_create_profiles;
pub mod m202601050005_create_events;
pub mod m202601050006_create_attendances;
