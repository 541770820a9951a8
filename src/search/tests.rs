use super::engine::search_titles;
use super::index::{delete_document, flush_domain, insert_document};
use super::tokenizer::{clean_words, prefixes};
use super::types::NewDocument;
use crate::stats::counters::document_count;
use crate::store::memory::{MemoryStore, StoreClient};
use std::sync::Arc;

const DOMAIN: &str = "peterbecom";

fn fresh_client() -> (Arc<MemoryStore>, StoreClient) {
    let store = MemoryStore::new();
    let client = StoreClient::new(store.clone());
    (store, client)
}

fn page(url: &str, title: &str, popularity: f64) -> NewDocument {
    NewDocument {
        url: url.to_string(),
        title: title.to_string(),
        item_type: "page".to_string(),
        group: None,
        popularity,
    }
}

fn grouped_page(url: &str, title: &str, popularity: f64, group: &str) -> NewDocument {
    NewDocument {
        group: Some(group.to_string()),
        ..page(url, title, popularity)
    }
}

fn result_urls(client: &mut StoreClient, query: &str, groups: &[&str], n: usize) -> Vec<String> {
    let groups: Vec<String> = groups.iter().map(|g| g.to_string()).collect();
    search_titles(client, DOMAIN, query, &groups, n)
        .unwrap()
        .results
        .into_iter()
        .map(|(url, _, _)| url)
        .collect()
}

// ============================================================
// TOKENIZER - clean_words
// ============================================================

#[test]
fn test_clean_words_lowercases_in_order() {
    let (terms, expanded) = clean_words("One Spotless Thing");

    assert_eq!(terms, vec!["one", "spotless", "thing"]);
    assert!(!expanded);
}

#[test]
fn test_clean_words_replaces_junk_with_spaces() {
    let (terms, _) = clean_words("Hello, World! (draft) [v2] {x}: done; really?");

    assert_eq!(
        terms,
        vec!["hello", "world", "draft", "v2", "x", "done", "really"]
    );
}

#[test]
fn test_clean_words_strips_quotation_apostrophes() {
    let (terms, _) = clean_words("The 'one' word");
    assert_eq!(terms, vec!["the", "one", "word"]);

    let (terms, _) = clean_words("'One' is a word");
    assert_eq!(terms, vec!["one", "is", "a", "word"]);
}

#[test]
fn test_clean_words_keeps_intra_word_apostrophes() {
    let (terms, _) = clean_words("they're at o'clock");

    assert_eq!(terms, vec!["they're", "at", "o'clock"]);
}

#[test]
fn test_clean_words_empty_and_junk_only_input() {
    assert_eq!(clean_words(""), (vec![], false));
    assert_eq!(clean_words("  ?!.,:;  "), (vec![], false));
}

#[test]
fn test_clean_words_transliteration_sets_expanded() {
    let (terms, expanded) = clean_words("café");

    assert_eq!(terms, vec!["café", "cafe"]);
    assert!(expanded);
}

#[test]
fn test_clean_words_appends_expansions_after_base_terms() {
    let (terms, expanded) = clean_words("café au lait");

    assert_eq!(terms, vec!["café", "au", "lait", "cafe"]);
    assert!(expanded);
}

#[test]
fn test_clean_words_ascii_never_expands() {
    let (terms, expanded) = clean_words("one spo");

    assert_eq!(terms, vec!["one", "spo"]);
    assert!(!expanded);
}

#[test]
fn test_clean_words_is_idempotent_on_its_own_output() {
    let (first, _) = clean_words("Hello, 'Worldly' Affairs!");
    let rejoined = first.join(" ");
    let (second, _) = clean_words(&rejoined);

    assert_eq!(first, second);
}

// ============================================================
// TOKENIZER - prefixes
// ============================================================

#[test]
fn test_prefixes_of_single_word() {
    assert_eq!(prefixes("One"), vec!["o", "on", "one", "one$"]);
}

#[test]
fn test_prefixes_cover_every_token() {
    let all = prefixes("One Spotless Thing");

    for expected in [
        "o", "on", "one", "one$", "s", "sp", "spo", "spotless", "spotless$", "t", "th", "thing",
        "thing$",
    ] {
        assert!(all.contains(&expected.to_string()), "missing {}", expected);
    }
}

#[test]
fn test_prefixes_never_empty() {
    for prefix in prefixes("a b c Hello") {
        assert!(!prefix.is_empty());
    }
}

#[test]
fn test_prefixes_slice_multibyte_words_on_char_boundaries() {
    let all = prefixes("café");

    // Both the original spelling and its transliteration get indexed.
    for expected in ["c", "ca", "caf", "café", "café$", "cafe", "cafe$"] {
        assert!(all.contains(&expected.to_string()), "missing {}", expected);
    }
}

#[test]
fn test_prefixes_single_char_word() {
    assert_eq!(prefixes("a"), vec!["a", "a$"]);
}

// ============================================================
// INSERT + SEARCH
// ============================================================

#[test]
fn test_basic_autocomplete() {
    let (_, mut client) = fresh_client();
    insert_document(&mut client, DOMAIN, &page("/a", "One Spotless Thing", 1.0)).unwrap();

    let response = search_titles(&mut client, DOMAIN, "spo", &[], 10).unwrap();
    assert_eq!(response.terms, vec!["spo"]);
    assert_eq!(
        response.results,
        vec![(
            "/a".to_string(),
            "One Spotless Thing".to_string(),
            "page".to_string()
        )]
    );
}

#[test]
fn test_completed_word_plus_open_word_matches() {
    let (_, mut client) = fresh_client();
    insert_document(&mut client, DOMAIN, &page("/a", "One Spotless Thing", 1.0)).unwrap();

    assert_eq!(result_urls(&mut client, "one spo", &[], 10), vec!["/a"]);
}

#[test]
fn test_completed_word_does_not_match_longer_word() {
    let (_, mut client) = fresh_client();
    insert_document(&mut client, DOMAIN, &page("/a", "Oneanother Sport", 1.0)).unwrap();

    // "one" is completed in the query, but only "oneanother$" was indexed.
    assert!(result_urls(&mut client, "one spo", &[], 10).is_empty());
    assert_eq!(result_urls(&mut client, "oneanother spo", &[], 10), vec!["/a"]);
}

#[test]
fn test_terms_echo_has_no_sentinel() {
    let (_, mut client) = fresh_client();
    insert_document(&mut client, DOMAIN, &page("/a", "One Spotless Thing", 1.0)).unwrap();

    let response = search_titles(&mut client, DOMAIN, "one spo", &[], 10).unwrap();
    assert_eq!(response.terms, vec!["one", "spo"]);
}

#[test]
fn test_popularity_orders_results() {
    let (_, mut client) = fresh_client();
    insert_document(&mut client, DOMAIN, &page("/b3", "Bank Holiday", 1.0)).unwrap();
    insert_document(&mut client, DOMAIN, &page("/b1", "Banana Bread", 3.0)).unwrap();
    insert_document(&mut client, DOMAIN, &page("/b2", "Bandana Style", 2.0)).unwrap();

    assert_eq!(result_urls(&mut client, "ba", &[], 2), vec!["/b1", "/b2"]);
}

#[test]
fn test_truncates_to_requested_n() {
    let (_, mut client) = fresh_client();
    for i in 0..5 {
        let url = format!("/doc/{}", i);
        insert_document(&mut client, DOMAIN, &page(&url, "Carrot Cake", i as f64)).unwrap();
    }

    assert_eq!(result_urls(&mut client, "ca", &[], 3).len(), 3);
}

#[test]
fn test_multi_word_queries_intersect_all_terms() {
    let (_, mut client) = fresh_client();
    insert_document(&mut client, DOMAIN, &page("/ab", "Alpha Beta", 2.0)).unwrap();
    insert_document(&mut client, DOMAIN, &page("/ag", "Alpha Gamma", 9.0)).unwrap();

    // Only the document with both words survives the intersection.
    assert_eq!(result_urls(&mut client, "alpha be", &[], 10), vec!["/ab"]);
}

#[test]
fn test_empty_query_returns_nothing() {
    let (_, mut client) = fresh_client();
    insert_document(&mut client, DOMAIN, &page("/a", "Something", 1.0)).unwrap();

    let response = search_titles(&mut client, DOMAIN, "", &[], 10).unwrap();
    assert!(response.terms.is_empty());
    assert!(response.results.is_empty());

    let response = search_titles(&mut client, DOMAIN, " ?!. ", &[], 10).unwrap();
    assert!(response.terms.is_empty());
    assert!(response.results.is_empty());
}

#[test]
fn test_no_match_returns_empty_results() {
    let (_, mut client) = fresh_client();
    insert_document(&mut client, DOMAIN, &page("/a", "Something", 1.0)).unwrap();

    assert!(result_urls(&mut client, "zzz", &[], 10).is_empty());
}

#[test]
fn test_domains_are_isolated() {
    let (_, mut client) = fresh_client();
    insert_document(&mut client, DOMAIN, &page("/a", "Blog about something", 1.0)).unwrap();
    insert_document(&mut client, "air.mozilla.org", &page("/b", "Also a blog", 1.0)).unwrap();

    assert_eq!(result_urls(&mut client, "blo", &[], 10), vec!["/a"]);
}

// ============================================================
// TRANSLITERATION
// ============================================================

#[test]
fn test_transliteration_mirror() {
    let (_, mut client) = fresh_client();
    insert_document(&mut client, DOMAIN, &page("/c", "Café Society", 1.0)).unwrap();

    assert_eq!(result_urls(&mut client, "cafe", &[], 10), vec!["/c"]);
    assert_eq!(result_urls(&mut client, "café", &[], 10), vec!["/c"]);
}

#[test]
fn test_expanded_query_skips_completed_word_marking() {
    let (_, mut client) = fresh_client();
    insert_document(&mut client, DOMAIN, &page("/c", "Café Society", 1.0)).unwrap();

    // "café soc" expands to ["café", "soc", "cafe"]; anchoring "café$"
    // and "soc$" would lose the still-open last base term, so nothing is
    // anchored and all three sets intersect.
    assert_eq!(result_urls(&mut client, "café soc", &[], 10), vec!["/c"]);
}

// ============================================================
// GROUPS
// ============================================================

#[test]
fn test_group_is_a_filter_not_a_tag() {
    let (_, mut client) = fresh_client();
    insert_document(
        &mut client,
        DOMAIN,
        &grouped_page("/p", "Private Notes", 1.0, "private"),
    )
    .unwrap();

    assert!(result_urls(&mut client, "pri", &[], 10).is_empty());
    assert_eq!(result_urls(&mut client, "pri", &["private"], 10), vec!["/p"]);
}

#[test]
fn test_base_and_group_results_merge_in_request_order() {
    let (_, mut client) = fresh_client();
    insert_document(&mut client, DOMAIN, &page("/base", "Shared Word", 5.0)).unwrap();
    insert_document(
        &mut client,
        DOMAIN,
        &grouped_page("/g1", "Shared Word", 3.0, "g1"),
    )
    .unwrap();
    insert_document(
        &mut client,
        DOMAIN,
        &grouped_page("/g2", "Shared Word", 4.0, "g2"),
    )
    .unwrap();

    let urls = result_urls(&mut client, "sha", &["g1", "g2"], 10);
    assert_eq!(urls, vec!["/base", "/g1", "/g2"]);
}

#[test]
fn test_reinserting_with_new_group_moves_the_document() {
    let (_, mut client) = fresh_client();
    insert_document(
        &mut client,
        DOMAIN,
        &grouped_page("/p", "Movable Feast", 1.0, "g1"),
    )
    .unwrap();
    insert_document(
        &mut client,
        DOMAIN,
        &grouped_page("/p", "Movable Feast", 1.0, "g2"),
    )
    .unwrap();

    // The old group's entries are gone, so asking for both groups
    // returns the URL exactly once.
    assert!(result_urls(&mut client, "mov", &["g1"], 10).is_empty());
    assert_eq!(result_urls(&mut client, "mov", &["g2"], 10), vec!["/p"]);
    assert_eq!(result_urls(&mut client, "mov", &["g1", "g2"], 10), vec!["/p"]);

    assert_eq!(document_count(&mut client, DOMAIN).unwrap(), 1);
}

// ============================================================
// RE-INSERT AND DELETE
// ============================================================

#[test]
fn test_reinsert_does_not_bump_document_count() {
    let (_, mut client) = fresh_client();
    insert_document(&mut client, DOMAIN, &page("/a", "First Title", 1.0)).unwrap();
    insert_document(&mut client, DOMAIN, &page("/a", "First Title", 2.0)).unwrap();

    assert_eq!(document_count(&mut client, DOMAIN).unwrap(), 1);
}

#[test]
fn test_reinsert_with_new_title_replaces_index_entries() {
    let (_, mut client) = fresh_client();
    insert_document(&mut client, DOMAIN, &page("/a", "Old Name", 1.0)).unwrap();
    insert_document(&mut client, DOMAIN, &page("/a", "New Name", 1.0)).unwrap();

    assert!(result_urls(&mut client, "old", &[], 10).is_empty());
    assert_eq!(result_urls(&mut client, "new", &[], 10), vec!["/a"]);
}

#[test]
fn test_delete_removes_document_everywhere() {
    let (_, mut client) = fresh_client();
    insert_document(&mut client, DOMAIN, &page("/a", "One Spotless Thing", 1.0)).unwrap();
    assert_eq!(document_count(&mut client, DOMAIN).unwrap(), 1);

    assert!(delete_document(&mut client, DOMAIN, "/a").unwrap());

    for query in ["one", "spo", "thing", "one spo"] {
        assert!(
            result_urls(&mut client, query, &[], 10).is_empty(),
            "query {:?} still matches after delete",
            query
        );
    }
    assert_eq!(document_count(&mut client, DOMAIN).unwrap(), 0);
}

#[test]
fn test_delete_unknown_url_reports_not_found() {
    let (_, mut client) = fresh_client();

    assert!(!delete_document(&mut client, DOMAIN, "/nope").unwrap());
    assert_eq!(document_count(&mut client, DOMAIN).unwrap(), 0);
}

#[test]
fn test_delete_grouped_document() {
    let (_, mut client) = fresh_client();
    insert_document(
        &mut client,
        DOMAIN,
        &grouped_page("/p", "Private Notes", 1.0, "private"),
    )
    .unwrap();

    assert!(delete_document(&mut client, DOMAIN, "/p").unwrap());
    assert!(result_urls(&mut client, "pri", &["private"], 10).is_empty());
}

#[test]
fn test_document_count_tracks_inserts_and_deletes() {
    let (_, mut client) = fresh_client();
    for (url, title) in [("/1", "Alpha"), ("/2", "Beta"), ("/3", "Gamma")] {
        insert_document(&mut client, DOMAIN, &page(url, title, 1.0)).unwrap();
    }
    assert_eq!(document_count(&mut client, DOMAIN).unwrap(), 3);

    delete_document(&mut client, DOMAIN, "/2").unwrap();
    assert_eq!(document_count(&mut client, DOMAIN).unwrap(), 2);
}

// ============================================================
// FLUSH
// ============================================================

#[test]
fn test_flush_empties_the_domain() {
    let (_, mut client) = fresh_client();
    insert_document(&mut client, DOMAIN, &page("/a", "One Spotless Thing", 1.0)).unwrap();
    insert_document(
        &mut client,
        DOMAIN,
        &grouped_page("/p", "Private Notes", 2.0, "private"),
    )
    .unwrap();

    let purged = flush_domain(&mut client, DOMAIN).unwrap();
    assert_eq!(purged, 2);

    assert!(result_urls(&mut client, "one", &[], 10).is_empty());
    assert!(result_urls(&mut client, "pri", &["private"], 10).is_empty());
    assert_eq!(document_count(&mut client, DOMAIN).unwrap(), 0);
}

#[test]
fn test_flush_leaves_no_key_residue() {
    let (store, mut client) = fresh_client();
    insert_document(&mut client, DOMAIN, &page("/a", "One Spotless Thing", 1.0)).unwrap();
    insert_document(
        &mut client,
        DOMAIN,
        &grouped_page("/p", "Private Notes", 2.0, "private"),
    )
    .unwrap();

    flush_domain(&mut client, DOMAIN).unwrap();

    // Only the zeroed document-count hash survives; every catalog hash and
    // prefix set was reclaimed.
    assert_eq!(store.key_count(), 1);
}

#[test]
fn test_flush_only_touches_its_own_domain() {
    let (_, mut client) = fresh_client();
    insert_document(&mut client, DOMAIN, &page("/a", "Blog post", 1.0)).unwrap();
    insert_document(&mut client, "other.example", &page("/b", "Blog entry", 1.0)).unwrap();

    flush_domain(&mut client, DOMAIN).unwrap();

    assert!(result_urls(&mut client, "blo", &[], 10).is_empty());
    let other = search_titles(&mut client, "other.example", "blo", &[], 10).unwrap();
    assert_eq!(other.results.len(), 1);
}
