use std::sync::Arc;

use tempfile::TempDir;

use calla::storage::Storage;
use calla::storage::file::FileStorage;
use calla::{IndexConfig, IndexWriter, QueryExpr, Representation, Token};

fn tokens(text: &str) -> Vec<Token> {
    text.split_whitespace().map(Token::new).collect()
}

fn build_toy_index(representation: Representation) -> calla::Result<(TempDir, calla::Searcher)> {
    let dir = TempDir::new().unwrap();
    let storage: Arc<dyn Storage> = Arc::new(FileStorage::new(dir.path())?);

    let config = IndexConfig {
        // Tiny capacities so even three documents exercise multiple
        // blocks and shards.
        block_capacity: 2,
        shard_capacity: 2,
        representation,
    };
    let mut writer = IndexWriter::new(storage, config);

    writer.add_document("texts/doc0", tokens("input users"))?;
    writer.add_document("texts/doc1", tokens("был input"))?;
    writer.add_document("texts/doc2", tokens("был users"))?;

    let searcher = writer.commit()?;
    Ok((dir, searcher))
}

#[test]
fn test_single_term_query() -> calla::Result<()> {
    for representation in [Representation::SortedList, Representation::Bitset] {
        let (_dir, searcher) = build_toy_index(representation)?;

        let hits = searcher.search(&QueryExpr::term("был"))?;
        assert_eq!(hits, vec!["texts/doc1", "texts/doc2"]);
    }
    Ok(())
}

#[test]
fn test_and_query() -> calla::Result<()> {
    for representation in [Representation::SortedList, Representation::Bitset] {
        let (_dir, searcher) = build_toy_index(representation)?;

        let expr = QueryExpr::and(QueryExpr::term("input"), QueryExpr::term("users"));
        assert_eq!(searcher.search(&expr)?, vec!["texts/doc0"]);
    }
    Ok(())
}

#[test]
fn test_or_not_query() -> calla::Result<()> {
    for representation in [Representation::SortedList, Representation::Bitset] {
        let (_dir, searcher) = build_toy_index(representation)?;

        // был OR NOT(input AND users): NOT(input AND users) = {doc1, doc2},
        // был = {doc1, doc2}, union = {doc1, doc2}.
        let expr = QueryExpr::or(
            QueryExpr::term("был"),
            QueryExpr::not(QueryExpr::and(
                QueryExpr::term("input"),
                QueryExpr::term("users"),
            )),
        );
        assert_eq!(searcher.search(&expr)?, vec!["texts/doc1", "texts/doc2"]);
    }
    Ok(())
}

#[test]
fn test_unknown_term_is_empty() -> calla::Result<()> {
    let (_dir, searcher) = build_toy_index(Representation::SortedList)?;

    let postings = searcher.lookup("nonexistent")?;
    assert!(postings.is_empty());
    assert!(searcher.search(&QueryExpr::term("nonexistent"))?.is_empty());
    Ok(())
}

#[test]
fn test_punctuation_never_indexed() -> calla::Result<()> {
    let dir = TempDir::new().unwrap();
    let storage: Arc<dyn Storage> = Arc::new(FileStorage::new(dir.path())?);
    let mut writer = IndexWriter::new(storage, IndexConfig::default());

    let mut stream = tokens("hello world");
    stream.push(Token::new("."));
    stream.push(Token::new("—"));
    stream.push(Token::punctuation("?!"));
    writer.add_document("texts/doc0", stream)?;

    assert_eq!(writer.term_count(), 2);
    let searcher = writer.commit()?;
    assert!(searcher.lookup(".")?.is_empty());
    assert_eq!(searcher.search(&QueryExpr::term("hello"))?, vec!["texts/doc0"]);
    Ok(())
}

#[test]
fn test_index_files_on_disk() -> calla::Result<()> {
    let (dir, searcher) = build_toy_index(Representation::SortedList)?;

    // The final index and its publish marker live under index/; the
    // intermediate blocks remain under blocks/ (clearing them between
    // builds is a deployment concern).
    assert!(dir.path().join("index/meta.json").is_file());
    assert!(dir.path().join("index/shard-0").is_file());
    assert!(dir.path().join("blocks/block-0/shard-0").is_file());

    drop(searcher);
    Ok(())
}

#[test]
fn test_reopen_searcher_on_same_storage() -> calla::Result<()> {
    let dir = TempDir::new().unwrap();
    let storage: Arc<dyn Storage> = Arc::new(FileStorage::new(dir.path())?);

    let mut writer = IndexWriter::new(storage.clone(), IndexConfig::default());
    writer.add_document("texts/doc0", tokens("persistent data"))?;
    let searcher = writer.commit()?;

    let hits = searcher.search(&QueryExpr::term("persistent"))?;
    assert_eq!(hits, vec!["texts/doc0"]);

    // The index is a plain directory of files; a second storage handle
    // over the same root sees the published index.
    let reopened: Arc<dyn Storage> = Arc::new(FileStorage::new(dir.path())?);
    let meta = calla::IndexMeta::read(&reopened)?;
    assert_eq!(meta.doc_count, 1);
    assert_eq!(meta.shard_count, 1);
    Ok(())
}
