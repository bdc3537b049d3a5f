use std::fs;
use std::time::Duration;

use repertoire_viewer::filter::select;
use repertoire_viewer::models::Resource;
use repertoire_viewer::{load_repertoire, spawn_loader, FeedSource, Guide, SortKey};
use tempfile::tempdir;

const FEED: &str = "Nombre,Artista,Género,Nivel,Contenido,Números,Notas,Partitura\r\n\
\"Song, \"\"Title\"\"\",Anon,Folk,★★☆☆☆,Verse and chorus,,,\r\n\
\r\n\
Amazing Grace,,Hymn,★★★★☆,,https://guides.example/grace-numbers,,\r\n\
  amazing   GRACE ,John Newton,,★★☆☆☆,Second voice,http://other.example,G A B,Sheet in binder p.4\r\n\
Bourrée,Handel,Baroque,★★★☆☆\r\n\
,orphan artist,,★★★★★\r\n";

#[test]
fn local_feed_is_parsed_grouped_and_filtered() {
    let dir = tempdir().expect("temporary directory");
    let path = dir.path().join("repertoire.csv");
    fs::write(&path, FEED).expect("feed written");

    let repertoire = load_repertoire(&FeedSource::File(path)).expect("feed loaded");
    assert_eq!(repertoire.header.len(), 8);
    assert_eq!(repertoire.rows.len(), 5);
    assert_eq!(repertoire.songs.len(), 3);

    let quoted = &repertoire.songs[0];
    assert_eq!(quoted.name, "Song, \"Title\"");
    assert_eq!(quoted.content, "Verse and chorus");

    let grace = repertoire.find("amazing grace").expect("grace grouped");
    assert_eq!(grace.name, "Amazing Grace");
    assert_eq!(grace.artist, "John Newton");
    assert_eq!(grace.genre, "Hymn");
    assert_eq!(grace.level_num, 4);
    assert_eq!(grace.content, "Second voice");
    assert_eq!(
        grace.resource(Guide::Numbers),
        Resource::Link("https://guides.example/grace-numbers")
    );
    assert_eq!(grace.resource(Guide::Notes), Resource::Text("G A B"));
    assert_eq!(grace.resource(Guide::Score), Resource::Text("Sheet in binder p.4"));

    let hard = select(&repertoire.songs, 3, "", &SortKey::LevelDesc);
    let names: Vec<&str> = hard.iter().map(|song| song.name.as_str()).collect();
    assert_eq!(names, vec!["Amazing Grace", "Bourrée"]);

    let by_artist = select(&repertoire.songs, 0, "handel", &SortKey::NameAsc);
    assert_eq!(by_artist.len(), 1);

    // The orphan row has no name but still shows up as a raw table row.
    let rows = select(&repertoire.rows, 5, "", &SortKey::NameAsc);
    assert_eq!(rows.len(), 1);
}

#[test]
fn background_loader_delivers_one_result() {
    let dir = tempdir().expect("temporary directory");
    let path = dir.path().join("repertoire.csv");
    fs::write(&path, FEED).expect("feed written");

    let feed = spawn_loader(FeedSource::File(path));
    let result = feed
        .recv_timeout(Duration::from_secs(5))
        .expect("loader answered");
    assert_eq!(result.expect("feed loaded").songs.len(), 3);
    assert!(feed.recv_timeout(Duration::from_millis(50)).is_err());
}

#[test]
fn empty_file_is_reported() {
    let dir = tempdir().expect("temporary directory");
    let path = dir.path().join("empty.csv");
    fs::write(&path, "\n\n").expect("feed written");

    let err = load_repertoire(&FeedSource::File(path)).expect_err("empty feed rejected");
    assert_eq!(err.to_string(), "the repertoire feed is empty");
}
