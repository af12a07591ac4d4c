use iced::widget::{column, container, scrollable};
use iced::Length;
use iced::{Element, Task, Theme};
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod omdb;
mod state;
mod ui;

use config::Config;
use omdb::{Failure, OmdbClient};
use state::address::{Route, SearchParams};
use state::data::{MovieDetail, SearchPage};
use state::debounce::Debouncer;
use state::detail::{DetailFetcher, DetailStatus};
use state::favourites::FavouritesStore;
use state::history::History;
use state::posters::PosterCache;
use state::search::{SearchEngine, SearchRequest};

/// Main application state
struct MovieFinder {
    /// OMDb API client (cheap to clone into tasks)
    client: OmdbClient,
    /// Persisted favourite ids
    favourites: FavouritesStore,
    /// Visited addresses; the current one drives every screen
    history: History,
    search: SearchEngine,
    details: DetailFetcher,
    posters: PosterCache,
    /// Holds the typed query until the user stops typing
    debouncer: Debouncer<String>,
    /// Text in the search box; runs ahead of the address while debouncing
    query_input: String,
    /// Last favourites write failure, shown under the nav bar
    status: Option<String>,
}

/// Application messages (events)
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// Search box edited
    QueryChanged(String),
    /// Enter pressed in the search box
    QuerySubmitted,
    /// Debounce timer for the given ticket ran out
    DebounceElapsed(u64),
    /// Go to an address (link, pagination, load more)
    Navigate(Route),
    Back,
    Forward,
    /// Search response tagged with its request generation
    SearchLoaded(u64, Result<SearchPage, Failure>),
    /// Lookup response for an IMDb id
    DetailLoaded(String, Result<MovieDetail, Failure>),
    /// Poster bytes for a URL (`None` on failure)
    PosterLoaded(String, Option<Vec<u8>>),
    AddFavourite(String),
    RemoveFavourite(String),
}

impl MovieFinder {
    /// Create a new instance of the application, starting at `initial`
    fn new(config: Config, favourites: FavouritesStore, initial: Route) -> (Self, Task<Message>) {
        let mut app = MovieFinder {
            client: OmdbClient::new(config.base_url, config.api_key),
            favourites,
            history: History::new(initial),
            search: SearchEngine::new(),
            details: DetailFetcher::new(config.detail_ttl),
            posters: PosterCache::new(),
            debouncer: Debouncer::new(config.debounce),
            query_input: String::new(),
            status: None,
        };

        let task = app.sync_route();
        (app, task)
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::QueryChanged(value) => {
                self.query_input = value.clone();
                let ticket = self.debouncer.schedule(value);
                let window = self.debouncer.window();
                Task::perform(tokio::time::sleep(window), move |_| {
                    Message::DebounceElapsed(ticket)
                })
            }
            Message::DebounceElapsed(ticket) => match self.debouncer.fire(ticket) {
                // Typing back to the active query changes nothing unless
                // its last fetch failed
                Some(value) if value != self.search.query() || self.search.needs_retry() => {
                    self.go_to(Route::Search(SearchParams::new(value)))
                }
                _ => Task::none(),
            },
            Message::QuerySubmitted => {
                self.debouncer.cancel();
                self.go_to(Route::Search(SearchParams::new(self.query_input.clone())))
            }
            Message::Navigate(route) => self.go_to(route),
            Message::Back => {
                if self.history.back().is_some() {
                    self.debouncer.cancel();
                    return self.sync_route();
                }
                Task::none()
            }
            Message::Forward => {
                if self.history.forward().is_some() {
                    self.debouncer.cancel();
                    return self.sync_route();
                }
                Task::none()
            }
            Message::SearchLoaded(generation, result) => {
                if self.search.apply(generation, result) {
                    return self.fetch_result_posters();
                }
                Task::none()
            }
            Message::DetailLoaded(id, result) => {
                self.details.apply(&id, result, Instant::now());
                self.fetch_detail_posters()
            }
            Message::PosterLoaded(url, bytes) => {
                self.posters.complete(&url, bytes);
                Task::none()
            }
            Message::AddFavourite(id) => {
                let result = self.favourites.add_favourite_movie(&id);
                self.record_store_result(result);
                Task::none()
            }
            Message::RemoveFavourite(id) => {
                let result = self.favourites.remove_favourite_movie(&id);
                self.record_store_result(result);
                Task::none()
            }
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let body: Element<Message> = match self.history.current() {
            Route::Search(_) => ui::search::view(
                &self.query_input,
                &self.search,
                &self.favourites,
                &self.posters,
            ),
            Route::Detail(_) => {
                ui::detail::view(self.details.status(), &self.favourites, &self.posters)
            }
            Route::Favourites => ui::favourites::view(&self.favourites, &self.details, &self.posters),
        };

        let nav = ui::nav::view(
            &self.history,
            self.search_route(),
            self.favourites.len(),
            self.status.as_deref(),
        );

        let content = column![
            nav,
            scrollable(container(body).padding(20).width(Length::Fill)).height(Length::Fill),
        ]
        .spacing(10)
        .padding(20);

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    /// Window title follows the screen
    fn title(&self) -> String {
        match self.history.current() {
            Route::Search(params) if params.query.is_empty() => {
                "Search movies - Movie Finder".to_string()
            }
            Route::Search(params) => format!("Search: {} - Movie Finder", params.query),
            Route::Detail(id) => match self.details.status() {
                DetailStatus::Loaded(detail) => format!("{} - Movie Finder", detail.title),
                _ => format!("{id} - Movie Finder"),
            },
            Route::Favourites => "Favourites - Movie Finder".to_string(),
        }
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }

    // ---- navigation ----

    /// Visit `route` and bring state in line with it
    fn go_to(&mut self, route: Route) -> Task<Message> {
        tracing::debug!(address = %route, "Navigate");
        if self.history.push(route) {
            return self.sync_route();
        }
        // Same address again: re-run a search whose fetch failed
        if matches!(self.history.current(), Route::Search(_)) && self.search.needs_retry() {
            return self.sync_route();
        }
        Task::none()
    }

    /// Address for the "Search" link: the active search as it stands
    fn search_route(&self) -> Route {
        let page = self.search.current_page();
        Route::Search(SearchParams {
            query: self.search.query().to_string(),
            page,
            more: page > 1,
        })
    }

    /// Derive screen state from the current address and start any fetches
    /// it needs
    fn sync_route(&mut self) -> Task<Message> {
        let now = Instant::now();

        match self.history.current().clone() {
            Route::Search(params) => {
                self.details.close();
                if !self.debouncer.is_pending() {
                    self.query_input = params.query.clone();
                }
                match self.search.navigate(&params) {
                    Some(request) => self.fetch_search(request),
                    None => self.fetch_result_posters(),
                }
            }
            Route::Detail(id) => match self.details.open(&id, now) {
                Some(id) => self.fetch_detail(id),
                None => self.fetch_detail_posters(),
            },
            Route::Favourites => {
                self.details.close();
                self.details.evict_expired(now);

                let ids = self.favourites.favourite_movies().to_vec();
                let mut tasks = Vec::new();
                for id in &ids {
                    if let Some(id) = self.details.lookup(id, now) {
                        tasks.push(self.fetch_detail(id));
                    }
                }
                tasks.push(self.fetch_detail_posters());
                Task::batch(tasks)
            }
        }
    }

    fn record_store_result(&mut self, result: Result<bool, state::favourites::StoreError>) {
        match result {
            Ok(_) => self.status = None,
            Err(error) => {
                tracing::error!(%error, "❌ Could not save favourites");
                self.status = Some(format!("Could not save favourites: {error}"));
            }
        }
    }

    // ---- background fetches ----

    fn fetch_search(&self, request: SearchRequest) -> Task<Message> {
        let client = self.client.clone();
        let generation = request.generation;
        Task::perform(
            async move {
                client
                    .search(&request.query, request.page)
                    .await
                    .map_err(Failure::from)
            },
            move |result| Message::SearchLoaded(generation, result),
        )
    }

    fn fetch_detail(&self, id: String) -> Task<Message> {
        let client = self.client.clone();
        Task::perform(
            async move {
                let result = client.lookup(&id).await.map_err(Failure::from);
                (id, result)
            },
            |(id, result)| Message::DetailLoaded(id, result),
        )
    }

    /// Posters for every result currently on screen
    fn fetch_result_posters(&mut self) -> Task<Message> {
        let urls: Vec<String> = self
            .search
            .visible_movies()
            .filter_map(|movie| movie.poster_url())
            .map(str::to_string)
            .collect();
        self.fetch_posters(urls)
    }

    /// Posters for the detail screen and any cached favourites
    fn fetch_detail_posters(&mut self) -> Task<Message> {
        let mut urls: Vec<String> = Vec::new();
        if let DetailStatus::Loaded(detail) = self.details.status() {
            urls.extend(detail.poster_url().map(str::to_string));
        }
        if *self.history.current() == Route::Favourites {
            urls.extend(
                self.favourites
                    .favourite_movies()
                    .iter()
                    .filter_map(|id| self.details.cached(id))
                    .filter_map(|detail| detail.poster_url())
                    .map(str::to_string),
            );
        }
        self.fetch_posters(urls)
    }

    fn fetch_posters(&mut self, urls: Vec<String>) -> Task<Message> {
        let mut tasks = Vec::new();
        for url in urls {
            if self.posters.request(&url) {
                tasks.push(self.fetch_poster(url));
            }
        }
        Task::batch(tasks)
    }

    fn fetch_poster(&self, url: String) -> Task<Message> {
        let client = self.client.clone();
        Task::perform(
            async move {
                let bytes = match client.poster(&url).await {
                    Ok(bytes) => Some(bytes),
                    Err(error) => {
                        tracing::debug!(%url, %error, "Poster download failed");
                        None
                    }
                };
                (url, bytes)
            },
            |(url, bytes)| Message::PosterLoaded(url, bytes),
        )
    }
}

fn main() -> iced::Result {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "movie_finder=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().unwrap_or_else(|error| {
        tracing::error!(%error, "❌ Invalid configuration");
        std::process::exit(1);
    });

    let favourites = FavouritesStore::open(&config.database_path()).unwrap_or_else(|error| {
        tracing::error!(%error, "❌ Could not open favourites database");
        std::process::exit(1);
    });

    // Optional starting address, e.g. `movie-finder "?query=alien&page=2"`
    let initial = std::env::args()
        .nth(1)
        .map(|address| Route::parse(&address))
        .unwrap_or_default();

    tracing::info!(
        address = %initial,
        favourites = favourites.len(),
        db = %favourites.path().display(),
        "🎬 Movie Finder starting"
    );

    iced::application(MovieFinder::title, MovieFinder::update, MovieFinder::view)
        .theme(MovieFinder::theme)
        .centered()
        .run_with(move || MovieFinder::new(config, favourites, initial))
}
