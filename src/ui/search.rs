use iced::widget::{column, row, text, text_input, Column};
use iced::{Element, Length};
use iced_aw::Wrap;

use super::{link, pagination, poster, CARD_WIDTH};
use crate::omdb::error::GENERIC_FETCH_ERROR;
use crate::state::address::{Route, SearchParams};
use crate::state::data::MovieSummary;
use crate::state::favourites::FavouritesStore;
use crate::state::posters::PosterCache;
use crate::state::search::{SearchEngine, SearchError};
use crate::Message;

const NO_RESULTS: &str = "Oops, no movies found";

/// Search screen: input, status line, result grid, load more, pagination
pub fn view<'a>(
    input: &'a str,
    search: &'a SearchEngine,
    favourites: &'a FavouritesStore,
    posters: &'a PosterCache,
) -> Element<'a, Message> {
    let search_box = text_input("Search for a movie", input)
        .on_input(Message::QueryChanged)
        .on_submit(Message::QuerySubmitted)
        .padding(10)
        .width(Length::Fixed(384.0));

    let mut content = Column::new().spacing(20).push(search_box);

    if !search.show_results() {
        if let Some(status) = status_line(search) {
            content = content.push(text(status));
        }
        return content.into();
    }

    let cards: Vec<Element<'a, Message>> = search
        .visible_movies()
        .map(|movie| card(movie, favourites, posters))
        .collect();

    content = content.push(
        text(format!(
            "{} results for \"{}\"",
            search.total_results(),
            search.query()
        ))
        .size(14),
    );
    content = content.push(Wrap::with_elements(cards).spacing(24.0).line_spacing(24.0));

    if search.is_loading() {
        content = content.push(text("Loading..."));
    }
    if search.error().is_some() {
        content = content.push(text(search.error_message().unwrap_or(GENERIC_FETCH_ERROR)));
    }

    let current = SearchParams {
        query: search.query().to_string(),
        page: search.current_page(),
        more: false,
    };

    if search.show_load_more() {
        content = content.push(link(text("» Load more «"), Route::Search(current.load_more())));
    }

    content
        .push(pagination::view(&current, search.page_count()))
        .into()
}

/// What to say when there is nothing to show
pub fn status_line(search: &SearchEngine) -> Option<&str> {
    if search.is_loading() {
        return Some("Searching...");
    }
    if let Some(SearchError::Fetch) = search.error() {
        return Some(GENERIC_FETCH_ERROR);
    }
    if search.show_no_results() {
        return Some(search.error_message().unwrap_or(NO_RESULTS));
    }
    None
}

fn card<'a>(
    movie: &'a MovieSummary,
    favourites: &FavouritesStore,
    posters: &PosterCache,
) -> Element<'a, Message> {
    let mut title = row![text(movie.title.as_str())].spacing(8);
    if favourites.is_favourite(&movie.imdb_id) {
        title = title.push(text("★"));
    }

    let subtitle = text(format!("{} · {}", movie.year, movie.media_type)).size(13);

    link(
        column![poster(posters, movie.poster_url(), CARD_WIDTH), title, subtitle]
            .spacing(8)
            .width(Length::Fixed(CARD_WIDTH)),
        Route::Detail(movie.imdb_id.clone()),
    )
    .into()
}
