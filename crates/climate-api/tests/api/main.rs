mod home;
mod sqlite_dataset;
