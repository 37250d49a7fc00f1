// tests/tokenizer_tests.rs

use nljq::compiler::RuleCompiler;
use nljq::tokenizer::{Tokenizer, WordTokenizer};

fn tokens(text: &str) -> Vec<String> {
    WordTokenizer::load().unwrap().tokenize(text)
}

// ============================================================================
// Word Tokenizer
// ============================================================================

#[test]
fn test_words_are_lowercased() {
    assert_eq!(tokens("Average AGE"), vec!["average", "age"]);
}

#[test]
fn test_symbols_are_separate_tokens() {
    assert_eq!(tokens("age>28"), vec!["age", ">", "28"]);
    assert_eq!(tokens("age = 30"), vec!["age", "=", "30"]);
}

#[test]
fn test_punctuation_is_split_off() {
    assert_eq!(tokens("name, please?"), vec!["name", ",", "please", "?"]);
}

#[test]
fn test_apostrophes_stay_inside_words() {
    assert_eq!(tokens("Alice's age"), vec!["alice's", "age"]);
}

#[test]
fn test_empty_and_blank_input() {
    assert!(tokens("").is_empty());
    assert!(tokens("   \t\n").is_empty());
}

// ============================================================================
// Substitution
// ============================================================================

/// Splits on single spaces only, so symbols glued to words are not tokens.
struct SpaceTokenizer;

impl Tokenizer for SpaceTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        text.split(' ')
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
            .collect()
    }
}

#[test]
fn test_compiler_uses_supplied_tokenizer() {
    let compiler = RuleCompiler::new(SpaceTokenizer);
    // "name," is not the token "name" for this tokenizer
    assert!(compiler.translate("name,").is_err());
    assert_eq!(compiler.translate("NAME").unwrap().as_str(), ".name");
}

#[test]
fn test_boxed_tokenizer() {
    let boxed: Box<dyn Tokenizer> = Box::new(WordTokenizer::load().unwrap());
    let compiler = RuleCompiler::new(boxed);
    assert_eq!(compiler.translate("city").unwrap().as_str(), ".address.city");
}
