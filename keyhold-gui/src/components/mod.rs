pub mod database_list;
pub mod new_database_dialog;
