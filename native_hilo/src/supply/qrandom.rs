//! Client for the qrandom.io deck API.
//!
//! A card is picked in two requests: fetch a shuffled deck, then ask the
//! random-number endpoint for an index into it.

use std::time::Duration;

use async_trait::async_trait;
use hilo_shared::Card;
use reqwest::header::{ACCEPT, CACHE_CONTROL};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

use super::{CardSupply, SupplyError};

pub const DEFAULT_API_BASE: &str = "https://qrandom.io/api/random";

#[derive(Debug, Deserialize)]
pub(crate) struct DeckResponse {
    pub deck: Option<Deck>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Deck {
    #[serde(default)]
    pub cards: Vec<RawCard>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawCard {
    pub suit: Option<String>,
    pub rank: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RandomIntResponse {
    pub number: Option<f64>,
}

#[derive(Clone, Debug)]
pub struct QrandomSupply {
    client: reqwest::Client,
    base: Url,
}

impl QrandomSupply {
    pub fn new(base: &str, timeout: Duration) -> Result<Self, SupplyError> {
        let base = Url::parse(base).map_err(|_| SupplyError::InvalidUrl(base.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(SupplyError::InvalidUrl(base.to_string()));
        }
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| SupplyError::Http {
                endpoint: "client",
                source,
            })?;
        Ok(Self { client, base })
    }

    pub(crate) fn endpoint(&self, leaf: &str) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(leaf);
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        url: Url,
    ) -> Result<T, SupplyError> {
        tracing::debug!(%url, "calling card API");
        let resp = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .header(CACHE_CONTROL, "no-cache")
            .send()
            .await
            .map_err(|source| SupplyError::Http { endpoint, source })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SupplyError::Status {
                endpoint,
                status: status.as_u16(),
                body,
            });
        }
        resp.json::<T>()
            .await
            .map_err(|source| SupplyError::Http { endpoint, source })
    }
}

/// Validate a deck response and return its cards.
pub(crate) fn deck_cards(resp: DeckResponse) -> Result<Vec<RawCard>, SupplyError> {
    match resp.deck {
        Some(deck) if !deck.cards.is_empty() => Ok(deck.cards),
        _ => Err(SupplyError::Malformed(
            "deck API returned no cards".to_string(),
        )),
    }
}

/// Pick the card at the API-provided index. A missing number means index 0.
pub(crate) fn pick_card(cards: &[RawCard], number: Option<f64>) -> Result<Card, SupplyError> {
    let index = number.unwrap_or(0.0).floor();
    if !(0.0..cards.len() as f64).contains(&index) {
        return Err(SupplyError::Malformed(format!(
            "random index {} is out of range for a deck of {}",
            index,
            cards.len()
        )));
    }
    let raw = &cards[index as usize];
    let (Some(rank), Some(suit)) = (raw.rank.as_deref(), raw.suit.as_deref()) else {
        return Err(SupplyError::Malformed(
            "selected card is missing suit or rank".to_string(),
        ));
    };
    Card::parse(rank, suit).map_err(|e| SupplyError::Malformed(e.to_string()))
}

#[async_trait]
impl CardSupply for QrandomSupply {
    async fn supply_random_card(&self) -> Result<Card, SupplyError> {
        let mut deck_url = self.endpoint("deck");
        deck_url.query_pairs_mut().append_pair("decks", "1");
        let deck: DeckResponse = self.get_json("deck API", deck_url).await?;
        let cards = deck_cards(deck)?;
        tracing::debug!(deck_size = cards.len(), "received deck");

        let mut int_url = self.endpoint("int");
        int_url
            .query_pairs_mut()
            .append_pair("min", "0")
            .append_pair("max", &(cards.len() - 1).to_string());
        let random: RandomIntResponse = self.get_json("random number API", int_url).await?;

        let card = pick_card(&cards, random.number)?;
        tracing::debug!(card = %card.code(), "selected card");
        Ok(card)
    }

    fn name(&self) -> &'static str {
        "qrandom"
    }
}
