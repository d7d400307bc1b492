use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202601050005_create_events"
    }
}

/// (table, member column, referenced table)
const MEMBERSHIPS: [(&str, &str, &str); 3] = [
    ("event_departments", "department_id", "departments"),
    ("event_programs", "program_id", "programs"),
    ("event_ssg_members", "ssg_profile_id", "ssg_profiles"),
];

fn membership_table(table: &str, member_col: &str, member_table: &str) -> TableCreateStatement {
    Table::create()
        .table(Alias::new(table))
        .if_not_exists()
        .col(ColumnDef::new(Alias::new("event_id")).integer().not_null())
        .col(ColumnDef::new(Alias::new(member_col)).integer().not_null())
        .primary_key(
            Index::create()
                .col(Alias::new("event_id"))
                .col(Alias::new(member_col)),
        )
        .foreign_key(
            ForeignKey::create()
                .name(format!("fk_{table}_event"))
                .from(Alias::new(table), Alias::new("event_id"))
                .to(Alias::new("events"), Alias::new("id"))
                .on_delete(ForeignKeyAction::Cascade)
                .on_update(ForeignKeyAction::Cascade),
        )
        .foreign_key(
            ForeignKey::create()
                .name(format!("fk_{table}_member"))
                .from(Alias::new(table), Alias::new(member_col))
                .to(Alias::new(member_table), Alias::new("id"))
                .on_delete(ForeignKeyAction::Cascade)
                .on_update(ForeignKeyAction::Cascade),
        )
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Alias::new("events"))
                    .if_not_exists()
                    .col(ColumnDef::new(Alias::new("id")).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Alias::new("name")).string_len(100).not_null())
                    .col(ColumnDef::new(Alias::new("location")).string_len(200).not_null())
                    .col(ColumnDef::new(Alias::new("start_datetime")).timestamp().not_null())
                    .col(ColumnDef::new(Alias::new("end_datetime")).timestamp().not_null())
                    .col(
                        ColumnDef::new(Alias::new("status"))
                            .enumeration(
                                Alias::new("event_status"),
                                vec![
                                    Alias::new("upcoming"),
                                    Alias::new("ongoing"),
                                    Alias::new("completed"),
                                    Alias::new("cancelled"),
                                ],
                            )
                            .not_null()
                            .default("upcoming"),
                    )
                    .check(Expr::cust("end_datetime > start_datetime"))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("ix_events_start")
                    .table(Alias::new("events"))
                    .col(Alias::new("start_datetime"))
                    .to_owned(),
            )
            .await?;

        for (table, member_col, member_table) in MEMBERSHIPS {
            manager
                .create_table(membership_table(table, member_col, member_table))
                .await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (table, _, _) in MEMBERSHIPS {
            manager
                .drop_table(Table::drop().table(Alias::new(table)).to_owned())
                .await?;
        }
        manager
            .drop_table(Table::drop().table(Alias::new("events")).to_owned())
            .await
    }
}
