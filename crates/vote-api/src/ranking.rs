use serde::Serialize;

/// Points awarded to a user's hall-of-fame score for each new vote.
/// Un-votes award nothing and claw nothing back.
const VOTE_POINTS: u32 = 10;

/// Client for the external hall-of-fame ranking service.
///
/// The ranking service is a collaborator, not part of the vote contract:
/// awards are fire-and-forget and a failed award never affects the vote
/// response.
#[derive(Clone)]
pub struct RankingClient {
    http: reqwest::Client,
    url: String,
}

#[derive(Serialize)]
struct ScoreUpdateRequest<'a> {
    #[serde(rename = "userId")]
    user_id: &'a str,
    points: u32,
}

impl RankingClient {
    /// Create a new ranking client posting score updates to `url`.
    pub fn new(url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            url,
        }
    }

    /// Award the fixed per-vote score to a user.
    pub async fn award_vote_points(&self, user_id: &str) -> Result<(), reqwest::Error> {
        let body = ScoreUpdateRequest {
            user_id,
            points: VOTE_POINTS,
        };

        let resp = self.http.post(&self.url).json(&body).send().await?;
        resp.error_for_status()?;
        Ok(())
    }
}
