pub mod file_type;
pub mod main_page;
pub mod search_mode;
pub mod search_result;
pub mod source_kind;

pub use self::{
    file_type::FileType,
    main_page::MainPage,
    search_mode::SearchMode,
    search_result::{
        Author,
        ExternalSource,
        Item,
        ItemSource,
        SearchResult,
        Source,
    },
    source_kind::SourceKind,
};
