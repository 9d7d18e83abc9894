// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! The full search pipeline.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use herald_common_core::{
	filter_by_date, format_search_time, merge_and_rank, parse_date, Article, ArticleSource,
	GroundingSource, LlmError, SearchError, SearchRequest, SearchResponse, SearchResult,
	SourceCounts, WebSearchInfo, WebSearchRequest, WebSearchResponse,
};
use herald_server_config::{OrchestrationConfig, SearchStrategy, ServerConfig};
use herald_server_search_gnews::GnewsClient;
use herald_server_search_google_cse::{CseClient, CseError, CseRequest, MAX_PER_REQUEST};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

use crate::compose::{compose, NewsSource};
use crate::enhance::enhance;
use crate::fallback::{sequential, SequentialOptions};
use crate::prober::ensure_configured;
use crate::prompts::research_prompt;
use crate::provider::ProviderRegistry;
use crate::race::race;

/// Shape the research prompt asks the model for.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResearchReply {
	#[serde(default)]
	articles: Vec<Article>,
	#[serde(default)]
	search_summary: String,
}

/// Result of one pipeline stage, before filtering and ranking.
struct Gathered {
	articles: Vec<Article>,
	search_summary: String,
	provider: Option<String>,
	model: Option<String>,
	grounding: Vec<GroundingSource>,
}

/// Which collaborators are configured, for health reporting.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderStatus {
	pub gnews: bool,
	pub google_cse: bool,
	pub ai: Vec<String>,
	pub strategy: SearchStrategy,
}

/// Orchestrates news APIs and AI providers for a search request.
#[derive(Clone)]
pub struct SearchService {
	news: Option<Arc<dyn NewsSource>>,
	web: Option<CseClient>,
	registry: ProviderRegistry,
	orchestration: OrchestrationConfig,
}

impl SearchService {
	pub fn new(registry: ProviderRegistry, orchestration: OrchestrationConfig) -> Self {
		Self {
			news: None,
			web: None,
			registry,
			orchestration,
		}
	}

	/// Builds every configured client from the resolved configuration.
	pub fn from_config(config: &ServerConfig) -> Result<Self, LlmError> {
		let registry = ProviderRegistry::from_config(&config.llm)?;
		let mut service = Self::new(registry, config.orchestration.clone());

		if let Some(api_key) = config.search.gnews.api_key.clone() {
			service = service.with_news_source(Arc::new(GnewsClient::new(api_key)));
		}
		if let (Some(api_key), Some(cx)) = (
			config.search.google_cse.api_key.clone(),
			config.search.google_cse.search_engine_id.clone(),
		) {
			service = service.with_web_search(CseClient::new(api_key, cx));
		}
		Ok(service)
	}

	pub fn with_news_source(mut self, source: Arc<dyn NewsSource>) -> Self {
		self.news = Some(source);
		self
	}

	pub fn with_web_search(mut self, client: CseClient) -> Self {
		self.web = Some(client);
		self
	}

	pub fn status(&self) -> ProviderStatus {
		ProviderStatus {
			gnews: self.news.is_some(),
			google_cse: self.web.is_some(),
			ai: self
				.registry
				.kinds()
				.into_iter()
				.map(|k| k.name().to_string())
				.collect(),
			strategy: self.orchestration.strategy,
		}
	}

	pub async fn search(&self, request: &SearchRequest) -> SearchResult<SearchResponse> {
		self.search_with_cancel(request, &CancellationToken::new())
			.await
	}

	/// Runs the pipeline; cancelling `cancel` aborts any in-flight AI calls.
	#[instrument(skip_all, fields(deep_research = request.deep_research))]
	pub async fn search_with_cancel(
		&self,
		request: &SearchRequest,
		cancel: &CancellationToken,
	) -> SearchResult<SearchResponse> {
		let started = Instant::now();
		let query = request.validated_query()?;
		ensure_configured(&self.registry.kinds(), self.news.is_some())?;

		let gathered = match &self.news {
			Some(news) => match self.news_search(news.as_ref(), query, request, cancel).await {
				Ok(gathered) => gathered,
				Err(e) if !self.registry.is_empty() => {
					warn!(error = %e, "news search failed, falling back to AI-only search");
					self.ai_search(query, request, cancel).await?
				}
				Err(e) => return Err(e),
			},
			None => self.ai_search(query, request, cancel).await?,
		};

		let mut articles = gathered.articles;
		if request.has_date_bounds() {
			articles = filter_by_date(articles, request.date_from(), request.date_to());
		}
		let articles = merge_and_rank([articles]);

		let response = SearchResponse {
			total_results: articles.len(),
			sources: SourceCounts::tally(&articles),
			articles,
			search_summary: gathered.search_summary,
			provider: gathered.provider,
			model: gathered.model,
			search_time: format_search_time(started.elapsed()),
			grounding_sources: gathered.grounding,
		};

		info!(
			total_results = response.total_results,
			provider = ?response.provider,
			search_time = %response.search_time,
			"search completed"
		);
		Ok(response)
	}

	async fn news_search(
		&self,
		news: &dyn NewsSource,
		query: &str,
		request: &SearchRequest,
		cancel: &CancellationToken,
	) -> SearchResult<Gathered> {
		let mut articles = compose(news, query, request, self.orchestration.variant_timeout()).await?;

		let search_summary = enhance(
			&self.registry.race_entrants(),
			&mut articles,
			query,
			self.orchestration.enhance_timeout(),
			cancel,
		)
		.await;

		Ok(Gathered {
			articles,
			search_summary,
			provider: Some(news.name().to_string()),
			model: None,
			grounding: Vec::new(),
		})
	}

	async fn ai_search(
		&self,
		query: &str,
		request: &SearchRequest,
		cancel: &CancellationToken,
	) -> SearchResult<Gathered> {
		let prompt = research_prompt(
			query,
			request.date_from(),
			request.date_to(),
			request.deep_research,
			Utc::now().date_naive(),
		);

		let completion = match self.orchestration.strategy {
			SearchStrategy::Race => {
				let entrants = self.registry.race_entrants();
				race::<ResearchReply>(&entrants, &prompt, self.orchestration.race_timeout(), cancel)
					.await
					.ok_or(SearchError::AllProvidersFailed {
						attempts: entrants.len(),
					})?
			}
			SearchStrategy::Sequential => {
				let options = SequentialOptions {
					attempt_timeout: self.orchestration.attempt_timeout(),
					delay: self.orchestration.fallback_delay(),
				};
				sequential::<ResearchReply>(&self.registry.sequential_candidates(), &prompt, options)
					.await?
			}
		};

		let articles = completion
			.value
			.articles
			.into_iter()
			.map(|article| article.with_source(ArticleSource::Ai))
			.collect();

		Ok(Gathered {
			articles,
			search_summary: completion.value.search_summary,
			provider: Some(completion.provider.name().to_string()),
			model: Some(completion.model),
			grounding: completion.grounding,
		})
	}

	/// One page of Google Custom Search results.
	#[instrument(skip_all)]
	pub async fn web_search(&self, request: &WebSearchRequest) -> SearchResult<WebSearchResponse> {
		let query = request.validated_query()?;
		let Some(client) = &self.web else {
			return Err(SearchError::Configuration {
				message: "Google Custom Search is not configured".to_string(),
				setup: BTreeMap::from([
					(
						"GOOGLE_API_KEY".to_string(),
						"Create a key at https://console.cloud.google.com/apis/credentials".to_string(),
					),
					(
						"GOOGLE_CSE_ID".to_string(),
						"Create a search engine at https://programmablesearchengine.google.com".to_string(),
					),
				]),
			});
		};

		let cse_request = CseRequest::new(query, MAX_PER_REQUEST)
			.with_start(request.start())
			.with_date_range(
				request.date_from().and_then(parse_date),
				request.date_to().and_then(parse_date),
			);

		let response = client.search(&cse_request).await.map_err(cse_error)?;

		let articles = filter_by_date(response.articles, request.date_from(), request.date_to());
		Ok(WebSearchResponse {
			articles,
			search_info: WebSearchInfo {
				total_results: response.total_results,
				search_time: response.search_time,
				query: response.query,
			},
			next_page: response.next_start,
		})
	}
}

fn cse_error(error: CseError) -> SearchError {
	if error.is_rate_limited() {
		SearchError::RateLimited {
			provider: "google_cse".to_string(),
			retry_after_secs: None,
		}
	} else {
		SearchError::upstream("google_cse", error.to_string())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::provider::{ProviderKind, RegisteredProvider};
	use crate::testing::{FakeLlm, FakeNews};
	use herald_common_config::Secret;
	use herald_common_core::LlmClient;
	use herald_server_config::OrchestrationConfigLayer;
	use serde_json::json;

	fn registry(providers: Vec<(ProviderKind, Arc<FakeLlm>)>) -> ProviderRegistry {
		ProviderRegistry::new(
			providers
				.into_iter()
				.map(|(kind, fake)| RegisteredProvider {
					kind,
					client: fake as Arc<dyn LlmClient>,
				})
				.collect(),
		)
	}

	fn orchestration(strategy: SearchStrategy) -> OrchestrationConfig {
		OrchestrationConfigLayer {
			strategy: Some(strategy),
			..Default::default()
		}
		.finalize()
	}

	fn gnews_page(prefix: &str, count: usize) -> Vec<Article> {
		(0..count)
			.map(|i| {
				Article::new(format!("{prefix} {i}"), format!("https://{prefix}.example/{i}"))
					.with_relevance(Article::position_score(i))
					.with_source(ArticleSource::Gnews)
			})
			.collect()
	}

	fn research_reply(articles: serde_json::Value) -> String {
		json!({ "articles": articles, "searchSummary": "Coverage overview" }).to_string()
	}

	#[tokio::test]
	async fn nothing_configured_is_a_configuration_error() {
		let service = SearchService::new(ProviderRegistry::default(), OrchestrationConfig::default());
		let err = service.search(&SearchRequest::new("ai")).await.unwrap_err();
		match err {
			SearchError::Configuration { setup, .. } => assert!(setup.contains_key("gnews")),
			other => panic!("unexpected error: {other:?}"),
		}
	}

	#[tokio::test]
	async fn blank_query_is_rejected_before_anything_else() {
		let llm = FakeLlm::ok("{}");
		let service = SearchService::new(
			registry(vec![(ProviderKind::Groq, llm.clone())]),
			OrchestrationConfig::default(),
		);
		let err = service.search(&SearchRequest::new("   ")).await.unwrap_err();
		assert!(matches!(err, SearchError::Validation(_)));
		assert_eq!(llm.calls(), 0);
	}

	#[tokio::test]
	async fn news_results_are_enhanced() {
		let news = FakeNews::new(vec![
			("ai", gnews_page("a", 5)),
			("ai latest", gnews_page("b", 5)),
			("ai news", gnews_page("a", 5)),
		]);
		let llm = FakeLlm::ok(r#"{"summaries": ["Sharper summary"], "overallAnalysis": "Mostly upbeat."}"#);
		let service = SearchService::new(
			registry(vec![(ProviderKind::Groq, llm.clone())]),
			OrchestrationConfig::default(),
		)
		.with_news_source(news);

		let response = service.search(&SearchRequest::new("ai")).await.unwrap();
		assert_eq!(response.provider.as_deref(), Some("gnews"));
		assert_eq!(response.model, None);
		assert_eq!(response.total_results, 10);
		assert_eq!(response.sources.gnews, 10);
		assert_eq!(response.search_summary, "Mostly upbeat.");
		assert_eq!(response.articles[0].summary, "Sharper summary");
		assert_eq!(llm.calls(), 1);
		assert!(response
			.articles
			.windows(2)
			.all(|w| w[0].relevance_score >= w[1].relevance_score));
	}

	#[tokio::test]
	async fn news_without_ai_uses_count_summary() {
		let news = FakeNews::new(vec![("ai", gnews_page("a", 3))]);
		let service = SearchService::new(ProviderRegistry::default(), OrchestrationConfig::default())
			.with_news_source(news);

		let response = service.search(&SearchRequest::new("ai")).await.unwrap();
		assert_eq!(response.search_summary, "Found 3 articles about \"ai\"");
	}

	#[tokio::test]
	async fn failed_news_falls_back_to_ai() {
		let news = FakeNews::new(vec![]);
		let llm = FakeLlm::ok(research_reply(json!([
			{ "title": "Low", "publisher": "AP", "url": "https://ap.example/1", "relevanceScore": 61 },
			{ "title": "High", "publisher": "BBC", "url": "https://bbc.example/1", "relevanceScore": "90" }
		])));
		let service = SearchService::new(
			registry(vec![(ProviderKind::Groq, llm)]),
			OrchestrationConfig::default(),
		)
		.with_news_source(news);

		let response = service.search(&SearchRequest::new("ai")).await.unwrap();
		assert_eq!(response.provider.as_deref(), Some("groq"));
		assert_eq!(response.model.as_deref(), Some("llama-3.3-70b-versatile"));
		assert_eq!(response.sources.ai, 2);
		assert_eq!(response.articles[0].title, "High");
		assert_eq!(response.search_summary, "Coverage overview");
	}

	#[tokio::test]
	async fn odd_field_types_keep_every_ai_article() {
		let llm = FakeLlm::ok(research_reply(json!([
			{ "title": "Fine", "publisher": "AP", "url": "https://ap.example/1", "relevanceScore": 80 },
			{ "title": 2025, "publisher": "BBC", "url": "https://bbc.example/1", "publishedDate": 20250110, "source": "BBC" }
		])));
		let service = SearchService::new(
			registry(vec![(ProviderKind::Groq, llm)]),
			OrchestrationConfig::default(),
		);

		let response = service.search(&SearchRequest::new("ai")).await.unwrap();
		assert_eq!(response.total_results, 2);
		assert_eq!(response.sources.ai, 2);
		assert_eq!(response.articles[1].title, "2025");
	}

	#[tokio::test]
	async fn failed_news_without_ai_surfaces_news_error() {
		let service = SearchService::new(ProviderRegistry::default(), OrchestrationConfig::default())
			.with_news_source(FakeNews::new(vec![]));
		let err = service.search(&SearchRequest::new("ai")).await.unwrap_err();
		assert!(matches!(err, SearchError::Upstream { .. }));
	}

	#[tokio::test]
	async fn date_filter_keeps_only_articles_in_range() {
		let llm = FakeLlm::ok(research_reply(json!([
			{ "title": "December", "url": "https://x.example/dec", "publishedDate": "2024-12-15", "relevanceScore": 95 },
			{ "title": "January", "url": "https://x.example/jan", "publishedDate": "2025-01-10", "relevanceScore": 80 }
		])));
		let service = SearchService::new(
			registry(vec![(ProviderKind::Gemini, llm)]),
			OrchestrationConfig::default(),
		);

		let request = SearchRequest::new("climate policy")
			.with_dates(Some("2025-01-01"), Some("2025-01-31"));
		let response = service.search(&request).await.unwrap();
		let titles: Vec<_> = response.articles.iter().map(|a| a.title.as_str()).collect();
		assert_eq!(titles, vec!["January"]);
		assert_eq!(response.total_results, 1);
	}

	#[tokio::test]
	async fn sequential_strategy_walks_models_in_order() {
		let groq = FakeLlm::err(LlmError::Api("model overloaded".into()));
		let openai = FakeLlm::ok(research_reply(json!([
			{ "title": "One", "url": "https://x.example/1" }
		])));
		let service = SearchService::new(
			registry(vec![
				(ProviderKind::OpenAi, openai.clone()),
				(ProviderKind::Groq, groq.clone()),
			]),
			orchestration(SearchStrategy::Sequential),
		);

		let response = service.search(&SearchRequest::new("ai")).await.unwrap();
		assert_eq!(response.provider.as_deref(), Some("openai"));
		assert_eq!(response.model.as_deref(), Some("gpt-4o-mini"));
		assert_eq!(
			groq.models(),
			vec!["llama-3.3-70b-versatile", "mixtral-8x7b-32768"]
		);
		assert_eq!(openai.calls(), 1);
	}

	#[tokio::test]
	async fn race_with_no_winner_fails() {
		let service = SearchService::new(
			registry(vec![
				(ProviderKind::Groq, FakeLlm::ok("sorry")),
				(ProviderKind::Together, FakeLlm::err(LlmError::Timeout)),
			]),
			OrchestrationConfig::default(),
		);
		let err = service.search(&SearchRequest::new("ai")).await.unwrap_err();
		assert!(matches!(err, SearchError::AllProvidersFailed { attempts: 2 }));
	}

	#[tokio::test]
	async fn web_search_requires_configuration() {
		let service = SearchService::new(ProviderRegistry::default(), OrchestrationConfig::default());
		let request = WebSearchRequest {
			q: Some("rust".to_string()),
			..Default::default()
		};
		let err = service.web_search(&request).await.unwrap_err();
		match err {
			SearchError::Configuration { setup, .. } => {
				assert!(setup.contains_key("GOOGLE_API_KEY"));
				assert!(setup.contains_key("GOOGLE_CSE_ID"));
			}
			other => panic!("unexpected error: {other:?}"),
		}
	}

	#[tokio::test]
	async fn web_search_pages_and_filters() {
		use wiremock::matchers::{method, query_param};
		use wiremock::{Mock, MockServer, ResponseTemplate};

		let server = MockServer::start().await;
		Mock::given(method("GET"))
			.and(query_param("start", "11"))
			.and(query_param("sort", "date:r:20250101:20250131"))
			.respond_with(ResponseTemplate::new(200).set_body_json(json!({
				"searchInformation": { "totalResults": "42", "searchTime": 0.2 },
				"queries": { "nextPage": [{ "startIndex": 21 }] },
				"items": [
					{ "title": "In range", "link": "https://a.example/1", "snippet": "Jan 12, 2025 ... text", "displayLink": "a.example" },
					{ "title": "Out of range", "link": "https://b.example/1", "snippet": "Dec 2, 2024 ... text", "displayLink": "b.example" }
				]
			})))
			.expect(1)
			.mount(&server)
			.await;

		let client = CseClient::new(Secret::new("k".to_string()), "cx").with_base_url(server.uri());
		let service = SearchService::new(ProviderRegistry::default(), OrchestrationConfig::default())
			.with_web_search(client);

		let request = WebSearchRequest {
			q: Some("rust".to_string()),
			date_from: Some("2025-01-01".to_string()),
			date_to: Some("2025-01-31".to_string()),
			start: Some(11),
		};
		let response = service.web_search(&request).await.unwrap();
		assert_eq!(response.articles.len(), 1);
		assert_eq!(response.articles[0].title, "In range");
		assert_eq!(response.search_info.total_results, 42);
		assert_eq!(response.search_info.query, "rust");
		assert_eq!(response.next_page, Some(21));
	}

	#[test]
	fn status_lists_configured_collaborators() {
		let service = SearchService::new(
			registry(vec![(ProviderKind::OpenRouter, FakeLlm::ok("{}"))]),
			OrchestrationConfig::default(),
		)
		.with_news_source(FakeNews::new(vec![]));
		let status = service.status();
		assert!(status.gnews);
		assert!(!status.google_cse);
		assert_eq!(status.ai, vec!["openrouter"]);
	}
}
