//! # Service Classifier
//!
//! Maps hostnames (nameservers, mail exchangers, CNAME targets) to the cloud, CDN or SaaS
//! provider that operates them, by substring match against a static catalog.
//!
//! Several catalog keys can match one host (`cdn.cloudflare.net` also contains `cloudflare`),
//! so precedence is fixed: the **longest** matching key wins, and equal-length matches fall
//! back to catalog order.

/// Label used when no catalog key matches.
pub const UNKNOWN_PROVIDER: &str = "Other";

const CATALOG: &[(&str, &str)] = &[
    ("cloudfront.net", "Amazon CloudFront CDN"),
    ("akamai.net", "Akamai CDN"),
    ("fastly.net", "Fastly CDN"),
    ("cdn.cloudflare.net", "Cloudflare CDN"),
    ("domains.tumblr.com", "Tumblr"),
    ("zendesk.com", "Zendesk"),
    ("bitly.com", "Bitly"),
    ("google", "Google Workspace"),
    ("outlook", "Microsoft 365"),
    ("office365", "Microsoft 365"),
    ("awsdns", "AWS Route 53"),
    ("cloudflare", "Cloudflare"),
    ("mimecast", "Mimecast"),
    ("googledomains", "Google Cloud DNS"),
    ("pages.github.io", "GitHub Pages"),
    ("sharepoint.com", "Microsoft SharePoint"),
    ("ultradns", "UltraDNS"),
    ("dynect.net", "Dynect"),
    ("salesforce.com", "Salesforce"),
    ("googleusercontent.com", "Google Cloud Storage"),
    ("c.storage.googleapis.com", "Google Cloud Storage (CNAME)"),
    ("s3.amazonaws.com", "Amazon S3"),
    ("s3-website", "Amazon S3 Static Website"),
    ("appspot.com", "Google App Engine"),
    ("azurewebsites.net", "Microsoft Azure Web Apps"),
    ("cloudapp.net", "Microsoft Azure Cloud Services"),
    ("trafficmanager.net", "Microsoft Azure Traffic Manager"),
    ("cdn.shopify.com", "Shopify CDN"),
    ("wixdns.net", "Wix"),
    ("squarespace.com", "Squarespace"),
    ("weebly.com", "Weebly"),
    ("godaddy.com", "GoDaddy"),
    ("bluehost.com", "Bluehost"),
    ("hostgator.com", "HostGator"),
    ("cloudfront", "Cloudfront"),
    ("dreamhost.com", "DreamHost"),
    ("inmotionhosting.com", "InMotion Hosting"),
    ("siteground.com", "SiteGround"),
    ("wpengine.com", "WP Engine"),
    ("digitalocean.com", "DigitalOcean"),
    ("linode.com", "Linode"),
    ("herokuapp.com", "Heroku"),
    ("aws.amazon.com", "Amazon Web Services"),
    ("azure.microsoft.com", "Microsoft Azure"),
    ("gcp.google.com", "Google Cloud Platform"),
    ("cloud.google.com", "Google Cloud Platform"),
    ("appharbor.com", "AppHarbor"),
    ("cdn.akamaized.net", "Akamai CDN"),
    ("cdn.jsdelivr.net", "jsDelivr CDN"),
    ("stackpath.bootstrapcdn.com", "Bootstrap CDN"),
    ("cdnjs.cloudflare.com", "cdnjs CDN"),
    ("maxcdn.bootstrapcdn.com", "Bootstrap CDN"),
    ("fonts.gstatic.com", "Google Fonts"),
    ("themes.googleusercontent.com", "Google Sites"),
    ("docs.google.com", "Google Docs"),
    ("sheets.google.com", "Google Sheets"),
    ("slides.google.com", "Google Slides"),
    ("sites.google.com", "Google Sites"),
    ("storage.googleapis.com", "Google Cloud Storage"),
    ("firebaseio.com", "Firebase Realtime Database"),
    ("firebaseapp.com", "Firebase Hosting"),
    ("console.aws.amazon.com", "Amazon Web Services Console"),
    ("console.cloud.google.com", "Google Cloud Console"),
    ("console.firebase.google.com", "Firebase Console"),
    ("dashboard.heroku.com", "Heroku Dashboard"),
    ("api.heroku.com", "Heroku Platform API"),
    ("dashboard.ngrok.com", "ngrok Dashboard"),
    ("statuspage.io", "Statuspage"),
    ("git-scm.com", "Git"),
    ("subversion.apache.org", "Subversion"),
    ("mercurial-scm.org", "Mercurial"),
    ("unity3d.com", "Unity"),
    ("unrealengine.com", "Unreal Engine"),
    ("blender.org", "Blender"),
    ("autodesk.com", "Autodesk"),
    ("openshift.com", "OpenShift"),
    ("jelastic.com", "Jelastic"),
    ("bitbucket.org", "Bitbucket"),
    ("gitlab.com", "GitLab"),
    ("travis-ci.com", "Travis CI"),
    ("circleci.com", "CircleCI"),
    ("jenkins.io", "Jenkins"),
    ("teamcity.com", "TeamCity"),
    ("codeship.com", "Codeship"),
    ("docker.com", "Docker"),
    ("kubernetes.io", "Kubernetes"),
    ("rabbitmq.com", "RabbitMQ"),
    ("redis.io", "Redis"),
    ("postgresql.org", "PostgreSQL"),
    ("mysql.com", "MySQL"),
    ("mongodb.com", "MongoDB"),
    ("elasticsearch.org", "Elasticsearch"),
    ("prometheus.io", "Prometheus"),
    ("grafana.com", "Grafana"),
    ("kibana.org", "Kibana"),
    ("logstash.net", "Logstash"),
    ("splunk.com", "Splunk"),
    ("sumologic.com", "Sumo Logic"),
    ("newrelic.com", "New Relic"),
    ("datadoghq.com", "Datadog"),
    ("pingdom.com", "Pingdom"),
    ("uptimerobot.com", "UptimeRobot"),
    ("cloudinary.com", "Cloudinary"),
    ("imgix.com", "Imgix"),
    ("twilio.com", "Twilio"),
    ("nexmo.com", "Nexmo"),
    ("sendgrid.com", "SendGrid"),
    ("mailchimp.com", "Mailchimp"),
    ("postmarkapp.com", "Postmark"),
    ("stripe.com", "Stripe"),
    ("paypal.com", "PayPal"),
    ("braintree.com", "Braintree"),
    ("squareup.com", "Square"),
    ("coinbase.com", "Coinbase"),
    ("blockchain.info", "Blockchain"),
    ("auth0.com", "Auth0"),
    ("okta.com", "Okta"),
    ("stormpath.com", "Stormpath"),
    ("firebase.google.com", "Firebase"),
    ("onesignal.com", "OneSignal"),
    ("pusher.com", "Pusher"),
];

/// Returns the provider operating `host`, if the catalog knows it.
pub fn classify(host: &str) -> Option<&'static str> {
    let host: String = host.to_ascii_lowercase();
    let mut best: Option<(&'static str, &'static str)> = None;

    for &(key, provider) in CATALOG {
        if !host.contains(key) {
            continue;
        }
        match best {
            Some((best_key, _)) if best_key.len() >= key.len() => {}
            _ => best = Some((key, provider)),
        }
    }

    best.map(|(_, provider)| provider)
}

/// Like [`classify`], falling back to [`UNKNOWN_PROVIDER`].
pub fn label(host: &str) -> &'static str {
    classify(host).unwrap_or(UNKNOWN_PROVIDER)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_prefers_longest_match() {
        // "cdn.cloudflare.net" and "cloudflare" both match.
        assert_eq!(classify("foo.cdn.cloudflare.net"), Some("Cloudflare CDN"));
        assert_eq!(classify("ns1.cloudflare.com"), Some("Cloudflare"));
        // "googledomains" outranks "google".
        assert_eq!(classify("ns-cloud-a1.googledomains.com."), Some("Google Cloud DNS"));
        assert_eq!(classify("aspmx.l.google.com"), Some("Google Workspace"));
        // "c.storage.googleapis.com" outranks "storage.googleapis.com".
        assert_eq!(
            classify("bucket.c.storage.googleapis.com"),
            Some("Google Cloud Storage (CNAME)")
        );
    }

    #[test]
    fn classify_is_case_insensitive() {
        assert_eq!(classify("NS-123.AWSDNS-45.COM"), Some("AWS Route 53"));
    }

    #[test]
    fn label_falls_back_to_other() {
        assert_eq!(classify("mail.example.org"), None);
        assert_eq!(label("mail.example.org"), UNKNOWN_PROVIDER);
        assert_eq!(label("example.mail.protection.outlook.com"), "Microsoft 365");
    }

    #[test]
    fn catalog_keys_are_unique_and_lowercase() {
        for (i, (key, _)) in CATALOG.iter().enumerate() {
            assert_eq!(*key, key.to_ascii_lowercase());
            assert!(
                CATALOG[i + 1..].iter().all(|(other, _)| other != key),
                "duplicate catalog key {key}"
            );
        }
    }
}
