use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202601050003_create_departments_programs"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in ["departments", "programs"] {
            manager
                .create_table(
                    Table::create()
                        .table(Alias::new(table))
                        .if_not_exists()
                        .col(ColumnDef::new(Alias::new("id")).integer().not_null().auto_increment().primary_key())
                        .col(ColumnDef::new(Alias::new("name")).string().not_null().unique_key())
                        .to_owned(),
                )
                .await?;
        }

        manager
            .create_table(
                Table::create()
                    .table(Alias::new("program_departments"))
                    .if_not_exists()
                    .col(ColumnDef::new(Alias::new("program_id")).integer().not_null())
                    .col(ColumnDef::new(Alias::new("department_id")).integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(Alias::new("program_id"))
                            .col(Alias::new("department_id")),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_program_departments_program")
                            .from(Alias::new("program_departments"), Alias::new("program_id"))
                            .to(Alias::new("programs"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_program_departments_department")
                            .from(Alias::new("program_departments"), Alias::new("department_id"))
                            .to(Alias::new("departments"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in ["program_departments", "programs", "departments"] {
            manager
                .drop_table(Table::drop().table(Alias::new(table)).to_owned())
                .await?;
        }
        Ok(())
    }
}
