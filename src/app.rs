use anyhow::Result;
use cardapio_api::{CachedApi, HttpApi, MealPlanApi, QueryCache};
use cardapio_db::{KvStore, SessionStore};
use cardapio_mealplan::{Alert, Command, Query};
use cardapio_shared::user::Session;

use crate::config::Config;

/// Everything a CLI command needs, opened once per invocation.
#[derive(Clone)]
pub struct App {
    pub config: Config,
    pub store: KvStore,
    pub sessions: SessionStore,
    pub cache: QueryCache,
}

impl App {
    /// Connects to the local store and applies pending migrations.
    pub async fn open(config: Config) -> Result<Self> {
        let pool =
            cardapio_db::connect(&config.store.url, config.store.max_connections).await?;
        cardapio_db::migrate(&pool).await?;

        let store = KvStore::new(pool);

        Ok(Self {
            cache: QueryCache::new(config.cache.capacity),
            config,
            sessions: SessionStore::new(store.clone()),
            store,
        })
    }

    /// The signed-in session, an error telling the user to log in otherwise.
    pub async fn session(&self) -> Result<Session> {
        match self.sessions.load().await? {
            Some(session) => Ok(session),
            None => anyhow::bail!("not logged in, run `cardapio login <USER_ID>` first"),
        }
    }

    /// Every client built by one `App` shares its bounded read cache.
    pub fn api(&self, session: &Session) -> Result<CachedApi<HttpApi>> {
        let api = HttpApi::new(&self.config.api)?.with_token(session.token.to_owned());

        Ok(CachedApi::with_cache(api, self.cache.clone()))
    }

    pub fn query<A: MealPlanApi>(&self, api: A) -> Query<A> {
        Query::new(
            api,
            self.config.calendar.week_start,
            self.config.calendar.timezone.to_owned(),
        )
    }

    pub fn command<A: MealPlanApi>(&self, api: A, alert: impl Alert + 'static) -> Command<A> {
        Command::new(api, alert).with_locale(self.config.calendar.locale.to_owned())
    }

    pub fn locale(&self) -> &str {
        &self.config.calendar.locale
    }
}

/// Alerts printed on stderr, one line each.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrAlert;

impl Alert for StderrAlert {
    fn show(&self, title: &str, message: &str) {
        eprintln!("{title}: {message}");
    }
}
