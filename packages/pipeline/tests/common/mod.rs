use sqlx::MySqlPool;
use testcontainers::runners::AsyncRunner;
use testcontainers::ContainerAsync;
use testcontainers_modules::mysql::Mysql;

use belex_pipeline::config::PipelineConfig;
use belex_pipeline::db;

pub struct TestDb {
    pub pool: MySqlPool,
    // Hold the container so it stays alive for the duration of the test
    _container: ContainerAsync<Mysql>,
}

impl TestDb {
    pub async fn new() -> Self {
        let container = Mysql::default().start().await.unwrap();

        let host_port = container.get_host_port_ipv4(3306).await.unwrap();
        let database_url = format!("mysql://root@127.0.0.1:{}/test", host_port);

        let config = PipelineConfig::new(&database_url);
        let pool = db::create_pool(&config).await.unwrap();
        db::run_migrations(&pool).await.unwrap();

        Self {
            pool,
            _container: container,
        }
    }
}
