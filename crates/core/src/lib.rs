pub mod cache;
pub mod config;
pub mod events;
pub mod forecast;
pub mod generator;
pub mod lines;
pub mod metrics;
pub mod pipeline;
pub mod scheduler;
pub mod status;
pub mod testing;

pub use cache::{
    create_kv_store, CacheBackend, CacheConfig, CacheError, KvStore, MemoryKvStore, RedisKvStore,
    SnapshotCache,
};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, DatabaseConfig,
    ForecastConfig, SanitizedConfig, ServerConfig,
};
pub use events::{EventStore, SqliteEventStore, StoreError};
pub use forecast::{forecast, Forecast, RiskLevel, DEFAULT_HORIZON_MINUTES};
pub use generator::{
    CycleBatch, Generator, GeneratorConfig, RandomStatusSource, StatusDraw, StatusSource,
};
pub use lines::{LineError, LineId, CATALOG};
pub use pipeline::{CycleOutcome, IngestCycle, PulseError, TransitPulse};
pub use scheduler::{IngestScheduler, SchedulerConfig, SchedulerStatus, TriggerOutcome};
pub use status::{Status, StatusSnapshot, StoredEvent, TransitEvent};
