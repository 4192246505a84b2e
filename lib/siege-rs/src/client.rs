use crate::{
    types::{
        MapStatsQuery,
        PlatformType,
        PlayerStatsResponse,
        Profile,
        ProfileList,
        Session,
    },
    Error,
    SiegeResult,
};
use serde::de::DeserializeOwned;
use url::Url;

/// The application id the public ubiservices api expects for siege.
const UBI_APP_ID: &str = "3587dcbb-7f81-457c-9781-0e3f29f6f56a";

/// The siege space id for pc stats.
const PC_SPACE_ID: &str = "5172a557-50b5-4665-b7db-e3f2e8c5041d";

const SESSIONS_URL: &str = "https://public-ubiservices.ubi.com/v3/profiles/sessions";
const PROFILES_URL: &str = "https://public-ubiservices.ubi.com/v3/profiles";
const DATADEV_URL: &str = "https://prod.datadev.ubisoft.com/v1/users";

/// Ubisoft stats client
#[derive(Debug, Clone)]
pub struct Client {
    client: reqwest::Client,
}

impl Client {
    /// Make a new client
    pub fn new() -> Self {
        Client {
            client: reqwest::Client::new(),
        }
    }

    /// Attach the headers every authenticated request needs.
    fn authorized(
        &self,
        builder: reqwest::RequestBuilder,
        session: &Session,
    ) -> reqwest::RequestBuilder {
        builder
            .header("Ubi-AppId", UBI_APP_ID)
            .header("Ubi-SessionId", session.session_id.as_str())
            .header("Ubi-LocaleCode", "en-US")
            .header("Authorization", format!("Ubi_v1 t={}", session.ticket))
            .header("expiration", session.expiration.as_str())
    }

    /// Send a request and parse the json body.
    async fn send_json<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> SiegeResult<T> {
        let res = builder.send().await?;
        let status = res.status();
        if !status.is_success() {
            return Err(Error::InvalidStatus(status));
        }
        let text = res.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Log in with a ubisoft account.
    pub async fn create_session(&self, email: &str, password: &str) -> SiegeResult<Session> {
        let builder = self
            .client
            .post(SESSIONS_URL)
            .basic_auth(email, Some(password))
            .header("Ubi-AppId", UBI_APP_ID)
            .json(&serde_json::json!({ "rememberMe": true }));

        self.send_json(builder).await
    }

    /// Look up profiles by their name on a platform.
    ///
    /// An empty list means that nobody by that name exists.
    pub async fn search_profiles(
        &self,
        session: &Session,
        name: &str,
        platform: PlatformType,
    ) -> SiegeResult<Vec<Profile>> {
        let url = Url::parse_with_params(
            PROFILES_URL,
            &[("nameOnPlatform", name), ("platformType", platform.as_str())],
        )?;

        let builder = self.authorized(self.client.get(url.as_str()), session);
        let list: ProfileList = self.send_json(builder).await?;

        Ok(list.profiles)
    }

    /// Get per-map ranked stats for a profile over a date range.
    pub async fn get_map_stats(
        &self,
        session: &Session,
        profile_id: &str,
        query: &MapStatsQuery,
    ) -> SiegeResult<PlayerStatsResponse> {
        let mut url = Url::parse(DATADEV_URL)?;
        url.path_segments_mut()
            .map_err(|_| Error::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .push(profile_id)
            .push("playerstats");
        url.query_pairs_mut()
            .append_pair("spaceId", PC_SPACE_ID)
            .append_pair("view", "current")
            .append_pair("aggregation", "maps")
            .append_pair("gameMode", "ranked")
            .append_pair("platformGroup", query.platform_group())
            .append_pair("teamRole", "all,attacker,defender")
            .append_pair("startDate", &query.start_date)
            .append_pair("endDate", &query.end_date);

        let builder = self.authorized(self.client.get(url.as_str()), session);
        self.send_json(builder).await
    }

    /// Log out, invalidating the ticket.
    pub async fn close_session(&self, session: Session) -> SiegeResult<()> {
        let builder = self.authorized(self.client.delete(SESSIONS_URL), &session);
        let res = builder.send().await?;
        let status = res.status();
        if !status.is_success() {
            return Err(Error::InvalidStatus(status));
        }

        Ok(())
    }
}

impl Default for Client {
    fn default() -> Self {
        Client::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn credentials() -> (String, String) {
        let email = std::env::var("EMAIL").expect("missing EMAIL");
        let password = std::env::var("PASSWORD").expect("missing PASSWORD");
        (email, password)
    }

    #[tokio::test]
    #[ignore = "requires EMAIL and PASSWORD of a ubisoft account"]
    async fn it_works() {
        let (email, password) = credentials();
        let client = Client::new();

        let session = client.create_session(&email, &password).await.unwrap();
        let profiles = client
            .search_profiles(&session, "Beaulo.TSM", PlatformType::Uplay)
            .await
            .unwrap();
        assert!(!profiles.is_empty());

        let query = MapStatsQuery::new("20220614", "20220801");
        let stats = client
            .get_map_stats(&session, &profiles[0].profile_id, &query)
            .await
            .unwrap();
        dbg!(&stats);

        client.close_session(session).await.unwrap();
    }
}
