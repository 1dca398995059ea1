use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create the platform's schema
        manager
            .get_connection()
            .execute_unprepared("CREATE SCHEMA IF NOT EXISTS eventbook;")
            .await?;

        manager
            .get_connection()
            .execute_unprepared("SET search_path TO eventbook, public;")
            .await?;

        // Grant the application user everything it needs inside the schema
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                DO $$ BEGIN
                    GRANT ALL PRIVILEGES ON DATABASE eventbook TO eventbook;
                    GRANT ALL ON SCHEMA eventbook TO eventbook;

                    ALTER DEFAULT PRIVILEGES IN SCHEMA eventbook GRANT ALL ON TABLES TO eventbook;
                    ALTER DEFAULT PRIVILEGES IN SCHEMA eventbook GRANT ALL ON SEQUENCES TO eventbook;
                END $$;
            "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                DO $$ BEGIN
                    ALTER DEFAULT PRIVILEGES IN SCHEMA eventbook REVOKE ALL ON SEQUENCES FROM eventbook;
                    ALTER DEFAULT PRIVILEGES IN SCHEMA eventbook REVOKE ALL ON TABLES FROM eventbook;
                    REVOKE ALL ON SCHEMA eventbook FROM eventbook;
                    REVOKE ALL PRIVILEGES ON DATABASE eventbook FROM eventbook;
                END $$;
            "#,
            )
            .await?;

        // Drop the schema (CASCADE will remove all objects in it)
        manager
            .get_connection()
            .execute_unprepared("DROP SCHEMA IF EXISTS eventbook CASCADE;")
            .await?;

        Ok(())
    }
}
