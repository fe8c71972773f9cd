use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};

use crate::error::CoreError;
use crate::model::{ProjectId, ProjectTally, UserId, Vote};
use crate::store::VoteStore;

/// DynamoDB-backed vote storage.
///
/// Uses two tables: a votes table keyed by (`user_id` HASH, `project_id`
/// RANGE) holding one item per active vote, and a tallies table keyed by
/// `project_id` holding an `ADD`-maintained counter.
pub struct DynamoVoteStore {
    client: Client,
    votes_table: String,
    tallies_table: String,
}

impl DynamoVoteStore {
    /// Create a new `DynamoVoteStore` by loading AWS configuration from the
    /// environment and constructing a DynamoDB client.
    pub async fn new(
        votes_table: impl Into<String>,
        tallies_table: impl Into<String>,
    ) -> Self {
        let config = aws_config::defaults(BehaviorVersion::latest()).load().await;
        let client = Client::new(&config);
        Self::with_client(client, votes_table, tallies_table)
    }

    /// Create a store around an existing client.
    pub fn with_client(
        client: Client,
        votes_table: impl Into<String>,
        tallies_table: impl Into<String>,
    ) -> Self {
        Self {
            client,
            votes_table: votes_table.into(),
            tallies_table: tallies_table.into(),
        }
    }

    /// The DynamoDB votes table name.
    pub fn votes_table(&self) -> &str {
        &self.votes_table
    }

    /// The DynamoDB tallies table name.
    pub fn tallies_table(&self) -> &str {
        &self.tallies_table
    }
}

fn count_from(attributes: Option<&std::collections::HashMap<String, AttributeValue>>) -> u64 {
    attributes
        .and_then(|attrs| attrs.get("count"))
        .and_then(|value| value.as_n().ok())
        .and_then(|n| n.parse::<i64>().ok())
        .map(|n| n.max(0) as u64)
        .unwrap_or(0)
}

#[async_trait]
impl VoteStore for DynamoVoteStore {
    async fn try_insert_vote(&self, vote: &Vote) -> Result<bool, CoreError> {
        let item = serde_dynamo::to_item(vote)?;

        let result = self
            .client
            .put_item()
            .table_name(&self.votes_table)
            .set_item(Some(item))
            .condition_expression("attribute_not_exists(user_id)")
            .send()
            .await;

        match result {
            Ok(_) => Ok(true),
            Err(e)
                if e.as_service_error()
                    .is_some_and(|se| se.is_conditional_check_failed_exception()) =>
            {
                Ok(false)
            }
            Err(e) => Err(CoreError::DynamoSdk(Box::new(e))),
        }
    }

    async fn try_remove_vote(
        &self,
        user: &UserId,
        project: &ProjectId,
    ) -> Result<bool, CoreError> {
        let result = self
            .client
            .delete_item()
            .table_name(&self.votes_table)
            .key("user_id", AttributeValue::S(user.to_string()))
            .key("project_id", AttributeValue::S(project.to_string()))
            .condition_expression("attribute_exists(user_id)")
            .send()
            .await;

        match result {
            Ok(_) => Ok(true),
            Err(e)
                if e.as_service_error()
                    .is_some_and(|se| se.is_conditional_check_failed_exception()) =>
            {
                Ok(false)
            }
            Err(e) => Err(CoreError::DynamoSdk(Box::new(e))),
        }
    }

    async fn bump_tally(&self, project: &ProjectId, delta: i64) -> Result<u64, CoreError> {
        // "count" is a DynamoDB reserved word, hence the #count alias.
        let mut update = self
            .client
            .update_item()
            .table_name(&self.tallies_table)
            .key("project_id", AttributeValue::S(project.to_string()))
            .update_expression("ADD #count :delta")
            .expression_attribute_names("#count", "count")
            .expression_attribute_values(":delta", AttributeValue::N(delta.to_string()))
            .return_values(ReturnValue::AllNew);

        if delta < 0 {
            // Refuse decrements the stored count cannot cover.
            update = update
                .condition_expression("attribute_exists(project_id) AND #count >= :min")
                .expression_attribute_values(
                    ":min",
                    AttributeValue::N(delta.unsigned_abs().to_string()),
                );
        }

        match update.send().await {
            Ok(output) => Ok(count_from(output.attributes())),
            Err(e)
                if e.as_service_error()
                    .is_some_and(|se| se.is_conditional_check_failed_exception()) =>
            {
                tracing::warn!(project = %project, delta, "tally decrement refused, count already at floor");
                self.get_tally(project).await
            }
            Err(e) => Err(CoreError::DynamoSdk(Box::new(e))),
        }
    }

    async fn get_tally(&self, project: &ProjectId) -> Result<u64, CoreError> {
        let result = self
            .client
            .get_item()
            .table_name(&self.tallies_table)
            .key("project_id", AttributeValue::S(project.to_string()))
            .send()
            .await
            .map_err(|e| CoreError::DynamoSdk(Box::new(e)))?;

        match result.item {
            Some(item) => {
                let tally: ProjectTally = serde_dynamo::from_item(item)?;
                Ok(tally.count)
            }
            None => Ok(0),
        }
    }
}
