use crate::seed::{Seeder, run_seeder};
use crate::seeds::{
    attendance::AttendanceSeeder, catalog::CatalogSeeder, event::EventSeeder, role::RoleSeeder,
    student::StudentSeeder, user::UserSeeder,
};
use migration::Migrator;
use sea_orm_migration::MigratorTrait;

mod seed;
mod seeds;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let db = match db::connect().await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("Failed to connect to database: {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = Migrator::up(&db, None).await {
        eprintln!("Failed to run migrations: {e}");
        std::process::exit(1);
    }

    for (seeder, name) in [
        (Box::new(RoleSeeder) as Box<dyn Seeder + Send + Sync>, "Role"),
        (Box::new(UserSeeder), "User"),
        (Box::new(CatalogSeeder), "Department/Program"),
        (Box::new(StudentSeeder), "Student"),
        (Box::new(EventSeeder), "Event"),
        (Box::new(AttendanceSeeder), "Attendance"),
    ] {
        run_seeder(&*seeder, name, &db).await;
    }
}
