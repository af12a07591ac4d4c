use iced::widget::{column, text, Column};
use iced::{Element, Length};
use iced_aw::Wrap;

use super::{link, poster, CARD_WIDTH};
use crate::state::address::Route;
use crate::state::detail::DetailFetcher;
use crate::state::favourites::FavouritesStore;
use crate::state::posters::PosterCache;
use crate::Message;

/// Grid of favourite movies, each looked up through the detail cache
pub fn view<'a>(
    favourites: &'a FavouritesStore,
    details: &'a DetailFetcher,
    posters: &'a PosterCache,
) -> Element<'a, Message> {
    let heading = text(format!("Favourites ({})", favourites.len())).size(28);

    if favourites.is_empty() {
        return column![heading, text("No favourites yet. Open a movie and add it.")]
            .spacing(20)
            .into();
    }

    let cards: Vec<Element<'a, Message>> = favourites
        .favourite_movies()
        .iter()
        .map(|id| card(id, details, posters))
        .collect();

    Column::new()
        .spacing(20)
        .push(heading)
        .push(Wrap::with_elements(cards).spacing(24.0).line_spacing(24.0))
        .into()
}

fn card<'a>(id: &'a str, details: &'a DetailFetcher, posters: &PosterCache) -> Element<'a, Message> {
    let Some(movie) = details.cached(id) else {
        let note = details.failure(id).unwrap_or("Loading ...");
        return column![text(id), text(note).size(13)]
            .spacing(4)
            .width(Length::Fixed(CARD_WIDTH))
            .into();
    };

    link(
        column![
            poster(posters, movie.poster_url(), CARD_WIDTH),
            text(movie.title.as_str()),
        ]
        .spacing(8)
        .width(Length::Fixed(CARD_WIDTH)),
        Route::Detail(movie.imdb_id.clone()),
    )
    .into()
}
