use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202601050004_create_profiles"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Alias::new("student_profiles"))
                    .if_not_exists()
                    .col(ColumnDef::new(Alias::new("id")).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Alias::new("user_id")).integer().not_null().unique_key())
                    .col(ColumnDef::new(Alias::new("student_id")).string_len(20).not_null().unique_key())
                    .col(ColumnDef::new(Alias::new("department_id")).integer().not_null())
                    .col(ColumnDef::new(Alias::new("program_id")).integer().not_null())
                    .col(ColumnDef::new(Alias::new("year_level")).integer().not_null().default(1))
                    .col(ColumnDef::new(Alias::new("face_encoding")).binary().null())
                    .col(ColumnDef::new(Alias::new("is_face_registered")).boolean().not_null().default(false))
                    .col(ColumnDef::new(Alias::new("registration_complete")).boolean().not_null().default(false))
                    .col(ColumnDef::new(Alias::new("section")).string().null())
                    .col(ColumnDef::new(Alias::new("rfid_tag")).string().null().unique_key())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_student_profiles_user")
                            .from(Alias::new("student_profiles"), Alias::new("user_id"))
                            .to(Alias::new("users"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_student_profiles_department")
                            .from(Alias::new("student_profiles"), Alias::new("department_id"))
                            .to(Alias::new("departments"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_student_profiles_program")
                            .from(Alias::new("student_profiles"), Alias::new("program_id"))
                            .to(Alias::new("programs"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Alias::new("ssg_profiles"))
                    .if_not_exists()
                    .col(ColumnDef::new(Alias::new("id")).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Alias::new("user_id")).integer().not_null().unique_key())
                    .col(ColumnDef::new(Alias::new("position")).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ssg_profiles_user")
                            .from(Alias::new("ssg_profiles"), Alias::new("user_id"))
                            .to(Alias::new("users"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Alias::new("ssg_profiles")).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Alias::new("student_profiles")).to_owned())
            .await
    }
}
