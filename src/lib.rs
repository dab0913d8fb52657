/*!
 * # qasplit - Question/Answer segmentation for OCR'd exam pages
 *
 * A Rust library that turns the recognized text lines of handwritten exam
 * pages into an ordered sequence of question and answer records, using marker
 * patterns and a small state machine instead of a language model.
 *
 * ## Features
 *
 * - Configurable, prioritized marker patterns (Question > Answer > Subdivision)
 * - OCR-tolerant labels (`Ql.` reads as question 1)
 * - Continuity across page boundaries: a question split over two images
 *   is reassembled into one record
 * - Implicit blocks for unmarked leading text and orphan answers
 * - Non-fatal structural warnings
 * - Text and JSON reports, batch processing of whole directories
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `segmentation`: the classification engine:
 *   - `segmentation::patterns`: marker recognizers
 *   - `segmentation::state`: transition table and continuity cursor
 *   - `segmentation::engine`: line-by-line classification
 *   - `segmentation::assembler`: record building
 * - `app_config`: Configuration management
 * - `ocr_input`: Loading recognized text from disk
 * - `output`: Report rendering
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod ocr_input;
pub mod output;
pub mod segmentation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use errors::{InputError, PatternError};
pub use segmentation::{
    segment_images, ClassificationEngine, DocumentAssembler, EngineOptions, PatternLibrary,
    PatternTable, SegmentedDocument,
};
