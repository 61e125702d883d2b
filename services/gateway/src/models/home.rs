//! Home page model

use serde::{Deserialize, Serialize};

use super::{Service, Therapist};

/// Aggregated data for the landing page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HomePageData {
    pub introduction: Option<Introduction>,
    pub services: Vec<Service>,
    pub therapists: Vec<Therapist>,
    pub blogs: Vec<BlogPost>,
    pub news: Vec<NewsItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Introduction {
    pub title: String,
    pub description: String,
    pub image_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BlogPost {
    pub id: u64,
    pub title: String,
    pub summary: String,
    pub image_url: String,
    pub publish_date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewsItem {
    pub id: u64,
    pub title: String,
    pub summary: String,
    pub publish_date: String,
}
