//! Deterministic seed data shaped like the public demo API: 10 users, each
//! with 10 posts, 10 albums, and 20 todos; 5 comments per post and 5 photos
//! per album.

use std::collections::BTreeMap;

use crate::{Address, Album, Comment, Company, Geo, Photo, Post, Store, Todo, User};

const USERS: [(&str, &str, &str); 10] = [
    ("Leanne Graham", "Bret", "Gwenborough"),
    ("Ervin Howell", "Antonette", "Wisokyburgh"),
    ("Clementine Bauch", "Samantha", "McKenziehaven"),
    ("Patricia Lebsack", "Karianne", "South Elvis"),
    ("Chelsey Dietrich", "Kamren", "Roscoeview"),
    ("Mrs. Dennis Schulist", "Leopoldo_Corkery", "South Christy"),
    ("Kurtis Weissnat", "Elwyn.Skiles", "Howemouth"),
    ("Nicholas Runolfsdottir V", "Maxime_Nienow", "Aliyaview"),
    ("Glenna Reichert", "Delphine", "Bartholomebury"),
    ("Clementina DuBuque", "Moriah.Stanton", "Lebsackbury"),
];

pub const POSTS_PER_USER: u64 = 10;
pub const ALBUMS_PER_USER: u64 = 10;
pub const TODOS_PER_USER: u64 = 20;
pub const COMMENTS_PER_POST: u64 = 5;
pub const PHOTOS_PER_ALBUM: u64 = 5;

pub fn seed() -> Store {
    let users: BTreeMap<u64, User> = USERS
        .iter()
        .zip(1u64..)
        .map(|(&(name, username, city), id)| {
            let user = User {
                id,
                name: name.to_string(),
                username: username.to_string(),
                email: format!("{}@example.com", username.to_lowercase()),
                phone: format!("1-770-736-80{id:02}"),
                website: format!("{}.org", username.to_lowercase()),
                company: Company {
                    name: format!("{} Group", name.split(' ').last().unwrap_or(name)),
                    catch_phrase: "Multi-layered client-server neural-net".to_string(),
                    bs: "harness real-time e-markets".to_string(),
                },
                address: Address {
                    street: format!("{id} Kulas Light"),
                    suite: format!("Apt. {}", 500 + id),
                    city: city.to_string(),
                    zipcode: format!("92998-38{id:02}"),
                    geo: Geo {
                        lat: format!("-37.{id}159"),
                        lng: format!("81.{id}496"),
                    },
                },
            };
            (id, user)
        })
        .collect();

    let user_count = users.len() as u64;

    let posts = (1..=user_count * POSTS_PER_USER)
        .map(|id| {
            let post = Post {
                id,
                user_id: (id - 1) / POSTS_PER_USER + 1,
                title: format!("post {id} title"),
                body: format!("body of post {id}"),
            };
            (id, post)
        })
        .collect();

    let comments = (1..=user_count * POSTS_PER_USER * COMMENTS_PER_POST)
        .map(|id| Comment {
            id,
            post_id: (id - 1) / COMMENTS_PER_POST + 1,
            name: format!("comment {id}"),
            email: format!("commenter{id}@example.com"),
            body: format!("body of comment {id}"),
        })
        .collect();

    let albums = (1..=user_count * ALBUMS_PER_USER)
        .map(|id| {
            let album = Album {
                id,
                user_id: (id - 1) / ALBUMS_PER_USER + 1,
                title: format!("album {id}"),
            };
            (id, album)
        })
        .collect();

    let photos = (1..=user_count * ALBUMS_PER_USER * PHOTOS_PER_ALBUM)
        .map(|id| {
            let color = id * 2654435 % 0xffffff;
            Photo {
                id,
                album_id: (id - 1) / PHOTOS_PER_ALBUM + 1,
                title: format!("photo {id}"),
                url: format!("https://via.placeholder.com/600/{color:06x}"),
                thumbnail_url: format!("https://via.placeholder.com/150/{color:06x}"),
            }
        })
        .collect();

    // 90 of the 200 todos start out completed.
    let todos = (1..=user_count * TODOS_PER_USER)
        .map(|id| {
            let todo = Todo {
                id,
                user_id: (id - 1) / TODOS_PER_USER + 1,
                title: format!("todo {id}"),
                completed: id % 9 < 4,
            };
            (id, todo)
        })
        .collect();

    Store {
        posts,
        comments,
        albums,
        photos,
        todos,
        users,
    }
}
