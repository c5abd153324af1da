pub mod award;
pub mod box_office;
pub mod genre;
pub mod industry;
pub mod movie;
pub mod movie_genre;
pub mod movie_person_role;
pub mod person;
