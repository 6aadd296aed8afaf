pub mod error;
pub mod reply;

use warp::{Filter, Rejection};

use crate::core::models::UserInfo;

/// Identity asserted by the authenticating proxy in front of the server.
pub fn remote_user() -> impl Filter<Extract = (Option<UserInfo>,), Error = Rejection> + Clone {
    warp::header::optional::<String>("x-remote-user")
        .and(warp::header::optional::<String>("x-remote-group"))
        .map(|user: Option<String>, groups: Option<String>| {
            let user = user.filter(|u| !u.is_empty())?;
            let groups = groups
                .map(|g| {
                    g.split(',')
                        .map(str::trim)
                        .filter(|g| !g.is_empty())
                        .map(ToString::to_string)
                        .collect::<Vec<String>>()
                })
                .unwrap_or_default();
            Some(UserInfo::new(user).with_groups(groups))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reads_user_and_groups() {
        let user = warp::test::request()
            .header("x-remote-user", "alice")
            .header("x-remote-group", "admins, devs,")
            .filter(&remote_user())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(user.name, "alice");
        assert_eq!(user.groups, vec!["admins", "devs"]);
    }

    #[tokio::test]
    async fn missing_user_is_none() {
        let user = warp::test::request()
            .header("x-remote-group", "admins")
            .filter(&remote_user())
            .await
            .unwrap();

        assert!(user.is_none());
    }
}
