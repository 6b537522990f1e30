pub mod autocomplete;
pub mod daily_list;
pub mod form;
pub mod repository;
