use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202601050006_create_attendances"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Alias::new("attendances"))
                    .if_not_exists()
                    .col(ColumnDef::new(Alias::new("id")).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Alias::new("student_id")).integer().not_null())
                    .col(ColumnDef::new(Alias::new("event_id")).integer().not_null())
                    .col(ColumnDef::new(Alias::new("time_in")).timestamp().not_null())
                    .col(ColumnDef::new(Alias::new("time_out")).timestamp().null())
                    .col(
                        ColumnDef::new(Alias::new("method"))
                            .enumeration(
                                Alias::new("attendance_method"),
                                vec![Alias::new("face_scan"), Alias::new("manual")],
                            )
                            .not_null()
                            .default("face_scan"),
                    )
                    .col(
                        ColumnDef::new(Alias::new("status"))
                            .enumeration(
                                Alias::new("attendance_status"),
                                vec![
                                    Alias::new("present"),
                                    Alias::new("absent"),
                                    Alias::new("excused"),
                                ],
                            )
                            .not_null()
                            .default("present"),
                    )
                    .col(ColumnDef::new(Alias::new("verified_by")).integer().null())
                    .col(ColumnDef::new(Alias::new("notes")).string_len(500).null())
                    .check(Expr::cust("time_out IS NULL OR time_out >= time_in"))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_attendances_student")
                            .from(Alias::new("attendances"), Alias::new("student_id"))
                            .to(Alias::new("student_profiles"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_attendances_event")
                            .from(Alias::new("attendances"), Alias::new("event_id"))
                            .to(Alias::new("events"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_attendances_verifier")
                            .from(Alias::new("attendances"), Alias::new("verified_by"))
                            .to(Alias::new("users"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("ix_attendances_event_student")
                    .table(Alias::new("attendances"))
                    .col(Alias::new("event_id"))
                    .col(Alias::new("student_id"))
                    .to_owned(),
            )
            .await?;

        // At most one open `present` row per (student, event).
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS ux_attendance_active \
                 ON attendances (student_id, event_id) \
                 WHERE time_out IS NULL AND status = 'present'",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Alias::new("attendances")).to_owned())
            .await
    }
}
