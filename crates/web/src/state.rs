//! Application state shared across handlers.

use std::sync::Arc;

use tokio::sync::broadcast;

use crate::config::HubConfig;
use crate::models::ChatMessage;
use crate::supabase::SupabaseClient;
use crate::claude::ClaudeClient;
use crate::toss::TossClient;

/// Capacity of the chat live-feed channel. Slow subscribers skip messages
/// rather than block inserts.
const CHAT_FEED_CAPACITY: usize = 64;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; holds configuration and the three vendor
/// clients, plus the broadcast channel that fans chat inserts out to other
/// open sessions.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: HubConfig,
    supabase: SupabaseClient,
    claude: ClaudeClient,
    toss: TossClient,
    chat_feed: broadcast::Sender<ChatMessage>,
}

impl AppState {
    /// Create a new application state from loaded configuration.
    #[must_use]
    pub fn new(config: HubConfig) -> Self {
        let supabase = SupabaseClient::new(&config.supabase);
        let claude = ClaudeClient::new(&config.claude);
        let toss = TossClient::new(&config.toss);
        let (chat_feed, _) = broadcast::channel(CHAT_FEED_CAPACITY);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                supabase,
                claude,
                toss,
                chat_feed,
            }),
        }
    }

    /// Get a reference to the configuration.
    #[must_use]
    pub fn config(&self) -> &HubConfig {
        &self.inner.config
    }

    /// Get a reference to the hosted platform client.
    #[must_use]
    pub fn supabase(&self) -> &SupabaseClient {
        &self.inner.supabase
    }

    /// Get a reference to the chat completion client.
    #[must_use]
    pub fn claude(&self) -> &ClaudeClient {
        &self.inner.claude
    }

    /// Get a reference to the payment gateway client.
    #[must_use]
    pub fn toss(&self) -> &TossClient {
        &self.inner.toss
    }

    /// Get a reference to the chat live-feed channel.
    #[must_use]
    pub fn chat_feed(&self) -> &broadcast::Sender<ChatMessage> {
        &self.inner.chat_feed
    }
}
